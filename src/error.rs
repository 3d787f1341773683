//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.
//! Parsing lyrics and manifests never fails; only IO, configuration and
//! playback can produce an [`Error`].

use thiserror::Error;

use crate::player::PlaybackError;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Audio transport refused or failed an operation
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}


#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn config_error_includes_hint() {
        let err = Error::config("MINIDEMO_SEEK_STEP is not a number", "Use whole seconds, e.g. 5");
        let msg = err.to_string();
        assert!(msg.contains("MINIDEMO_SEEK_STEP"));
        assert!(msg.contains("whole seconds"));
    }

    #[test]
    fn io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        match Error::io(source, std::path::PathBuf::from("songs/manifest.txt")) {
            Error::Io { path: Some(p), .. } => assert!(p.ends_with("manifest.txt")),
            other => panic!("Expected Io error with path, got {other:?}"),
        }
    }

    #[test]
    fn message_converts_from_string() {
        let err: Error = format!("task {} failed", 3).into();
        assert!(matches!(err, Error::Msg(ref m) if m == "task 3 failed"));
    }

    #[test]
    fn playback_error_converts() {
        let err: Error = PlaybackError::Blocked.into();
        assert!(matches!(err, Error::Playback(PlaybackError::Blocked)));
    }
}
