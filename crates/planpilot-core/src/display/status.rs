//! One-line feedback for completed commands.

use std::fmt;

/// Outcome line printed after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationStatus {
    pub message: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Notice,
    Failure,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Success,
        }
    }

    /// A soft notice, e.g. that fallback content was used.
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Notice,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Failure,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            StatusKind::Success => "Success:",
            StatusKind::Notice => "Notice:",
            StatusKind::Failure => "Error:",
        };
        writeln!(f, "{prefix} {}", self.message)
    }
}
