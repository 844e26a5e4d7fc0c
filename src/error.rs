use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::chat::ChatError;

/// Error severity for CLI display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Info,    // informational, nothing was lost
    Warning, // recoverable, fewer records
    Error,   // operation failed
}

/// Domain-specific errors for the agent portal
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Failed to parse demo metadata in '{path}': {message}")]
    MetadataParse { path: String, message: String },

    #[error("Invalid page filename '{filename}': {reason}")]
    FilenameFormat { filename: String, reason: String },

    #[error("Pages directory not found: {path}")]
    DirectoryMissing { path: String },

    #[error("I/O error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Chat(#[from] ChatError),
}

impl PortalError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MetadataParse { .. } => ErrorSeverity::Warning,
            Self::FilenameFormat { .. } => ErrorSeverity::Warning,
            Self::DirectoryMissing { .. } => ErrorSeverity::Info,
            Self::Io { .. } => ErrorSeverity::Error,
            Self::Chat(_) => ErrorSeverity::Error,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::MetadataParse { path, .. } => {
                format!("Could not read the demo metadata of {}", path)
            }
            Self::FilenameFormat { filename, reason } => {
                format!("Skipped {}: {}", filename, reason)
            }
            Self::DirectoryMissing { path } => format!("No demo pages found at {}", path),
            Self::Io { path, .. } => format!("Could not access {}", path),
            Self::Chat(e) => e.user_message(),
        }
    }
}

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use agent_portal::error::ResultExt;
///
/// store.save(&path).log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_are_never_fatal() {
        let errors = [
            PortalError::MetadataParse {
                path: "1_a_b.py".into(),
                message: "unbalanced".into(),
            },
            PortalError::FilenameFormat {
                filename: "bad.py".into(),
                reason: "too few parts".into(),
            },
            PortalError::DirectoryMissing {
                path: "/nope".into(),
            },
        ];
        for err in errors {
            assert!(matches!(
                err.severity(),
                ErrorSeverity::Info | ErrorSeverity::Warning
            ));
        }
    }

    #[test]
    fn test_chat_error_uses_generic_message() {
        let err = PortalError::from(ChatError::Status(500));
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.user_message(), ChatError::Status(500).user_message());
    }

    #[test]
    fn test_result_ext_returns_none_on_error() {
        let ok: std::result::Result<u8, String> = Ok(3);
        assert_eq!(ok.log_err(), Some(3));

        let err: std::result::Result<u8, String> = Err("boom".into());
        assert_eq!(err.log_err(), None);
    }
}
