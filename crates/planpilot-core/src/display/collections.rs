//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper handles the empty case with a short sentence so callers never
//! print a bare heading.

use std::fmt;

use crate::{
    curriculum::CompetencySuggestion,
    models::{Competency, Plan, Severity},
    quality::QualityReport,
    workflow::{is_step_accessible, steps_for, validate_step},
};

/// Newtype wrapper for displaying catalog search results.
///
/// # Examples
///
/// ```rust
/// use planpilot_core::{curriculum::Catalog, display::Competencies};
///
/// let catalog = Catalog::lehrplan21();
/// let results = Competencies(catalog.competencies()[..2].to_vec());
/// let output = results.to_string();
/// assert!(output.contains(&catalog.competencies()[0].code));
/// ```
pub struct Competencies(pub Vec<Competency>);

impl Competencies {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Competencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "Keine Kompetenzen gefunden.");
        }
        for competency in &self.0 {
            write!(f, "{competency}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying suggested competencies with confidence.
pub struct Suggestions(pub Vec<CompetencySuggestion>);

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Suggestions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(
                f,
                "Keine Vorschläge. Ergänze Fach, Thema oder Lernziele für bessere Treffer."
            );
        }
        for suggestion in &self.0 {
            let c = &suggestion.competency;
            writeln!(
                f,
                "- **{}** ({:.0}%) {}",
                c.code,
                suggestion.confidence * 100.0,
                c.competency
            )?;
        }
        Ok(())
    }
}

/// The wizard's step list with access and completion markers.
///
/// `→` marks the current step, `✓` a complete step, `🔒` a step that cannot
/// be entered yet.
pub struct StepOverview<'a> {
    pub plan: &'a Plan,
    pub current_step: u8,
}

impl<'a> StepOverview<'a> {
    pub fn new(plan: &'a Plan, current_step: u8) -> Self {
        Self { plan, current_step }
    }
}

impl fmt::Display for StepOverview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Schritte ({})", self.plan.mode)?;
        writeln!(f)?;
        for step in steps_for(self.plan.mode) {
            let marker = if step.id == self.current_step {
                "→"
            } else if !is_step_accessible(step.id, self.plan) {
                "🔒"
            } else if validate_step(step.id, self.plan).is_valid() {
                "✓"
            } else {
                "·"
            };
            write!(f, "{marker} **{}. {}**", step.id, step.title)?;
            if let Some(gate) = step.gate_label {
                write!(f, " `{gate}`")?;
            }
            writeln!(f, " {}", step.description)?;
        }
        Ok(())
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Qualitätscheck")?;
        writeln!(f)?;
        if self.is_clean() {
            return writeln!(f, "Keine Auffälligkeiten gefunden.");
        }

        writeln!(
            f,
            "{} Fehler · {} Warnungen · {} Hinweise",
            self.count(Severity::Error),
            self.count(Severity::Warning),
            self.count(Severity::Info)
        )?;
        writeln!(f)?;

        let mut warnings: Vec<_> = self.warnings.iter().collect();
        warnings.sort_by_key(|w| w.severity);
        for warning in warnings {
            write!(f, "{warning}")?;
        }

        if !self.compatibility.compatible {
            writeln!(f)?;
            writeln!(f, "### Didaktische Kombination")?;
            writeln!(f)?;
            for warning in &self.compatibility.warnings {
                write!(f, "{warning}")?;
            }
        }
        Ok(())
    }
}
