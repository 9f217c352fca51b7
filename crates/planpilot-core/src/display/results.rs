//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use jiff::Timestamp;

use super::LocalDateTime;
use crate::{
    planner::{ExportResult, GenerationReport, UploadSummary},
    session::Session,
    workflow::{step_config, STEP_COUNT},
};

/// Wrapper type for displaying the current session at a glance.
///
/// Shows the step position, the plan overview, and where and when the draft
/// was last saved.
///
/// # Examples
///
/// ```rust
/// use planpilot_core::{display::SessionStatus, Session};
///
/// let session = Session::new();
/// let status = SessionStatus::new(&session, "offline");
/// let output = status.to_string();
/// assert!(output.contains("Schritt 1 von 9: Kontext"));
/// assert!(output.contains("noch nicht gespeichert"));
/// ```
pub struct SessionStatus<'a> {
    pub session: &'a Session,
    pub generator: &'a str,
    pub saved_at: Option<Timestamp>,
}

impl<'a> SessionStatus<'a> {
    pub fn new(session: &'a Session, generator: &'a str) -> Self {
        Self {
            session,
            generator,
            saved_at: None,
        }
    }

    pub fn with_saved_at(mut self, saved_at: Option<Timestamp>) -> Self {
        self.saved_at = saved_at;
        self
    }
}

impl fmt::Display for SessionStatus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.session.plan();
        let step = self.session.current_step();
        let title = step_config(plan.mode, step).map_or("?", |config| config.title);

        writeln!(f, "**Schritt {step} von {STEP_COUNT}: {title}**")?;
        writeln!(f)?;
        write!(f, "{plan}")?;
        writeln!(f)?;

        if self.session.has_unrevised_edits() {
            writeln!(f, "_Die Kurzversion enthält Änderungen, die noch nicht überarbeitet wurden._")?;
        }
        if !self.session.validation_errors().is_empty() {
            write!(f, "{}", ValidationErrors(self.session.validation_errors()))?;
        }
        writeln!(f, "- **KI**: {}", self.generator)?;
        writeln!(
            f,
            "- **Rückgängig/Wiederholen**: {}/{}",
            self.session.history().undo_depth(),
            self.session.history().redo_depth()
        )?;
        match &self.saved_at {
            Some(saved_at) => writeln!(f, "- **Entwurf gespeichert**: {}", LocalDateTime(saved_at)),
            None => writeln!(f, "- **Entwurf**: noch nicht gespeichert"),
        }
    }
}

/// Reasons a step cannot be completed.
pub struct ValidationErrors<'a>(pub &'a [String]);

impl fmt::Display for ValidationErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        writeln!(f, "**Bitte ergänze noch:**")?;
        writeln!(f)?;
        for error in self.0 {
            writeln!(f, "- {error}")?;
        }
        writeln!(f)
    }
}

/// Wrapper type for displaying a changed resource with a change list.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl<T: fmt::Display> fmt::Display for UpdateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.changes.is_empty() {
            writeln!(f, "Geändert:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationReport::Generated => writeln!(f, "Inhalt wurde von der KI erstellt."),
            GenerationReport::FellBack { notice } | GenerationReport::Unchanged { notice } => {
                writeln!(f, "{notice}")
            }
            GenerationReport::Cancelled => writeln!(f, "Generierung abgebrochen."),
        }
    }
}

/// Outcome of generating details for several lessons.
pub struct LessonReports<'a>(pub &'a [(usize, GenerationReport)]);

impl fmt::Display for LessonReports<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "Keine Lektionen geplant.");
        }
        for (index, report) in self.0 {
            write!(f, "- Lektion {}: {report}", index + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ExportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => writeln!(
                f,
                "Exportiert als {} nach `{}`",
                self.format,
                path.display()
            ),
            None => write!(f, "{}", self.content),
        }
    }
}

impl fmt::Display for UploadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} Kompetenzen gelesen, {} neu zugeordnet.",
            self.competencies.len(),
            self.added
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::export::ExportFormat;

    #[test]
    fn test_validation_errors_empty_prints_nothing() {
        assert_eq!(ValidationErrors(&[]).to_string(), "");
        let errors = vec!["Bitte wähle eine Stufe.".to_string()];
        assert!(ValidationErrors(&errors)
            .to_string()
            .contains("- Bitte wähle eine Stufe."));
    }

    #[test]
    fn test_session_status_mentions_saved_time() {
        let session = Session::new();
        let output = SessionStatus::new(&session, "offline")
            .with_saved_at(Some(Timestamp::UNIX_EPOCH))
            .to_string();
        assert!(output.contains("Entwurf gespeichert"));
        assert!(output.contains("- **KI**: offline"));
    }

    #[test]
    fn test_lesson_reports() {
        let reports = vec![
            (0, GenerationReport::Generated),
            (
                1,
                GenerationReport::FellBack {
                    notice: "Vorlage verwendet.".to_string(),
                },
            ),
        ];
        let output = LessonReports(&reports).to_string();
        assert!(output.contains("- Lektion 1: Inhalt wurde von der KI erstellt."));
        assert!(output.contains("- Lektion 2: Vorlage verwendet."));
    }

    #[test]
    fn test_export_result_with_and_without_path() {
        let mut result = ExportResult {
            format: ExportFormat::Markdown,
            file_name: "plan.md".to_string(),
            path: None,
            content: "# Plan\n".to_string(),
        };
        assert_eq!(result.to_string(), "# Plan\n");

        result.path = Some(PathBuf::from("/tmp/plan.md"));
        assert!(result.to_string().contains("`/tmp/plan.md`"));
    }
}
