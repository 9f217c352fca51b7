//! Export of a finished plan to files the teacher can share or print.
//!
//! Markdown and LaTeX are rendered from one format-neutral block list so
//! both documents carry the same sections in the same order. JSON is the
//! plan record itself, pretty printed, and can be loaded again.

mod document;
pub mod latex;
pub mod markdown;

use std::{fmt, str::FromStr};

use jiff::Timestamp;

pub use latex::{latex_escape, render_latex};
pub use markdown::render_markdown;

use crate::{error::Result, models::Plan};

/// Target format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Latex,
    Json,
}

impl ExportFormat {
    pub const ALL: &'static [ExportFormat] =
        &[ExportFormat::Markdown, ExportFormat::Latex, ExportFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Latex => "latex",
            ExportFormat::Json => "json",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Latex => "tex",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "latex" | "tex" => Ok(ExportFormat::Latex),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Invalid export format: {s}")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File name offered for an export, e.g. `PlanPilot_Natur_und_Technik_1718000000.md`.
pub fn default_file_name(plan: &Plan, format: ExportFormat, generated_at: &Timestamp) -> String {
    let subject = plan.subject.split_whitespace().collect::<Vec<_>>().join("_");
    let subject = if subject.is_empty() {
        "Planung".to_string()
    } else {
        subject.replace(['/', '\\'], "-")
    };
    format!(
        "PlanPilot_{subject}_{}.{}",
        generated_at.as_second(),
        format.file_extension()
    )
}

/// Renders `plan` in the requested format.
pub fn render_export(plan: &Plan, format: ExportFormat, generated_at: &Timestamp) -> Result<String> {
    match format {
        ExportFormat::Markdown => Ok(render_markdown(plan, generated_at)),
        ExportFormat::Latex => Ok(render_latex(plan, generated_at)),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(plan)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing_accepts_extensions() {
        assert_eq!("md".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert_eq!("LaTeX".parse::<ExportFormat>(), Ok(ExportFormat::Latex));
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_default_file_name_joins_subject_words() {
        let plan = Plan {
            subject: "Natur und  Technik".to_string(),
            ..Default::default()
        };
        let ts = Timestamp::from_second(1_718_000_000).unwrap();

        assert_eq!(
            default_file_name(&plan, ExportFormat::Json, &ts),
            "PlanPilot_Natur_und_Technik_1718000000.json"
        );
        assert_eq!(
            default_file_name(&Plan::default(), ExportFormat::Latex, &ts),
            "PlanPilot_Planung_1718000000.tex"
        );
    }

    #[test]
    fn test_json_export_round_trips_plan() {
        let plan = Plan {
            subject: "Deutsch".to_string(),
            goals: vec!["Lesen".to_string()],
            ..Default::default()
        };
        let text = render_export(&plan, ExportFormat::Json, &Timestamp::UNIX_EPOCH).unwrap();
        let parsed: Plan = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed, plan);
        assert!(text.contains("\"subject\": \"Deutsch\""));
    }
}
