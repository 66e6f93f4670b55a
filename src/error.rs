//! Error types for tldsgen
//!
//! Every stage of the pipeline returns [`Result`]. There is no local recovery:
//! a failure in any feed, in the template, or on the filesystem aborts the run,
//! and the binary reports it once before exiting non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tldsgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tldsgen
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error(
        "configuration error: {message}{}",
        .key.as_ref().map(|k| format!(" (at {k})")).unwrap_or_default()
    )]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "feeds[1].url")
        key: Option<String>,
    },

    /// The request for a feed could not be sent or the connection failed
    #[error("{url}: {reason}")]
    Transport {
        /// Feed location
        url: String,
        /// Underlying transport failure
        reason: String,
    },

    /// The feed answered with a client or server error status
    #[error("{url}: HTTP {status}")]
    HttpStatus {
        /// Feed location
        url: String,
        /// Numeric status code (always >= 400)
        status: u16,
    },

    /// Reading the feed body failed after the connection was established
    #[error("{url}: failed reading feed: {source}")]
    Stream {
        /// Feed location
        url: String,
        /// Underlying read error
        #[source]
        source: std::io::Error,
    },

    /// A feed task panicked or was cancelled before reporting a result
    #[error("feed task failed: {reason}")]
    Task {
        /// Description of the join failure
        reason: String,
    },

    /// Template registration or rendering failed
    #[error("template error: {0}")]
    Template(String),

    /// The artifact could not be created, written or moved into place
    #[error("failed to write {path}: {source}")]
    Artifact {
        /// Destination path of the artifact
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build a configuration error for a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// The feed location this error relates to, if any
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Transport { url, .. }
            | Error::HttpStatus { url, .. }
            | Error::Stream { url, .. } => Some(url),
            _ => None,
        }
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(e: handlebars::TemplateError) -> Self {
        Error::Template(e.to_string())
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(e: handlebars::RenderError) -> Self {
        Error::Template(e.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        let reason = if e.is_panic() {
            "task panicked".to_string()
        } else {
            e.to_string()
        };
        Error::Task { reason }
    }
}
