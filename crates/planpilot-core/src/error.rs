//! Error types for the planpilot library.

use std::path::PathBuf;

use thiserror::Error;

use crate::generation::GenerationError;

/// Comprehensive error type for all planpilot operations.
#[derive(Error, Debug)]
pub enum PilotError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// A wizard step is not reachable with the current plan state
    #[error("Step {step} is not accessible yet")]
    StepLocked { step: u8 },
    /// A wizard step still has unresolved validation messages
    #[error("Step {step} is incomplete: {}", reasons.join(" "))]
    StepIncomplete { step: u8, reasons: Vec<String> },
    /// A gate cannot be approved in the current state
    #[error("Gate {gate} cannot be approved: {reason}")]
    GateLocked { gate: char, reason: String },
    /// Curriculum uploads that are unsupported or yield nothing
    #[error("Upload error for '{file_name}': {reason}")]
    Upload { file_name: String, reason: String },
    /// Failures while talking to the generation service
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> PilotError {
        PilotError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PilotError {
        PilotError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

/// Builder for creating upload errors.
pub struct UploadErrorBuilder {
    file_name: String,
}

impl UploadErrorBuilder {
    /// Create a new upload error builder for a file name.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PilotError {
        PilotError::Upload {
            file_name: self.file_name,
            reason: reason.into(),
        }
    }
}

impl PilotError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a builder for upload errors.
    pub fn upload(file_name: impl Into<String>) -> UploadErrorBuilder {
        UploadErrorBuilder::new(file_name)
    }

    /// Wraps a blocking task join failure.
    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PilotError::database(message).with_source(e))
    }
}

/// Result type alias for planpilot operations
pub type Result<T> = std::result::Result<T, PilotError>;
