//! Error types for arc-wrap

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for arc-wrap
#[derive(Debug, Error)]
pub enum ArcWrapError {
    /// A reviewer fragment matched no eligible directory record
    #[error("no reviewer in the directory matches '{0}'")]
    NoMatch(String),

    /// Disambiguation input was non-numeric or out of range
    #[error("invalid selection '{input}': expected a number between 1 and {limit}")]
    InvalidSelection { input: String, limit: usize },

    /// The directory-service query failed or returned an error payload
    #[error("directory query '{method}' failed: {message}")]
    DirectoryQuery { method: String, message: String },

    /// Writing the merged user config failed
    #[error("failed to write config {path:?}: {message}")]
    ConfigWrite { path: PathBuf, message: String },

    /// A shorthand flag was used without its required value
    #[error("flag '{0}' requires a value")]
    MalformedArgument(String),

    /// The external tool could not be launched
    #[error("failed to launch '{program}': {message}")]
    ToolLaunch { program: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for arc-wrap
pub type Result<T> = std::result::Result<T, ArcWrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_display() {
        let err = ArcWrapError::NoMatch("zz".to_string());
        assert_eq!(err.to_string(), "no reviewer in the directory matches 'zz'");
    }

    #[test]
    fn test_invalid_selection_display() {
        let err = ArcWrapError::InvalidSelection {
            input: "x".to_string(),
            limit: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid selection 'x': expected a number between 1 and 3"
        );
    }

    #[test]
    fn test_directory_query_display() {
        let err = ArcWrapError::DirectoryQuery {
            method: "user.query".to_string(),
            message: "exit status 1".to_string(),
        };
        assert!(err.to_string().contains("user.query"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ArcWrapError = io_err.into();
        assert!(matches!(err, ArcWrapError::Io(_)));
    }
}
