//! Advisory findings produced by the quality and compatibility checks.

use serde::{Deserialize, Serialize};

/// Area a warning concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningKind {
    Time,
    Compatibility,
    Language,
    Workload,
    Resources,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::Time => "time",
            WarningKind::Compatibility => "compatibility",
            WarningKind::Language => "language",
            WarningKind::Workload => "workload",
            WarningKind::Resources => "resources",
        }
    }
}

/// Severity of a warning.
///
/// The derived ordering puts errors first, then warnings, then info, which is
/// the order reports are presented in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A single advisory finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityWarning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl QualityWarning {
    pub fn new(kind: WarningKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Outcome of checking the didactic slots against the incompatibility table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub compatible: bool,
    pub warnings: Vec<QualityWarning>,
    pub alternatives: Vec<String>,
}
