//! Failures of the generation service and their classification.

use thiserror::Error;

/// Coarse classification used for user messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimited,
    Timeout,
    Generic,
}

impl ErrorKind {
    /// German notice shown to the teacher.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::RateLimited => {
                "KI-Limit erreicht. Bitte warte einen Moment und versuche es erneut."
            }
            ErrorKind::Timeout => {
                "Die KI hat nicht rechtzeitig geantwortet. Bitte versuche es erneut."
            }
            ErrorKind::Generic => "Die KI-Generierung ist fehlgeschlagen.",
        }
    }
}

/// Errors that can occur while requesting generated content.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation service is not configured: {0}")]
    NotConfigured(String),
    #[error("Invalid generation context: {0}")]
    InvalidContext(String),
    #[error("Generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Generation request timed out")]
    Timeout,
    #[error("Generation request failed: {0}")]
    Transport(String),
    #[error("Generation service returned an unusable response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Status { status: 429, .. } => ErrorKind::RateLimited,
            GenerationError::Status {
                status: 408 | 504, ..
            }
            | GenerationError::Timeout => ErrorKind::Timeout,
            _ => ErrorKind::Generic,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            GenerationError::Timeout
        } else if error.is_decode() {
            GenerationError::InvalidResponse(error.to_string())
        } else {
            GenerationError::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> GenerationError {
        GenerationError::Status {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(status(429).kind(), ErrorKind::RateLimited);
        assert_eq!(status(408).kind(), ErrorKind::Timeout);
        assert_eq!(status(504).kind(), ErrorKind::Timeout);
        assert_eq!(GenerationError::Timeout.kind(), ErrorKind::Timeout);
        assert_eq!(status(500).kind(), ErrorKind::Generic);
        assert_eq!(
            GenerationError::NotConfigured("no key".into()).kind(),
            ErrorKind::Generic
        );
    }

    #[test]
    fn test_user_messages_differ_per_kind() {
        assert!(status(429).user_message().contains("KI-Limit"));
        assert!(GenerationError::Timeout.user_message().contains("rechtzeitig"));
    }
}
