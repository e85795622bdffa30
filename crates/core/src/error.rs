//! Error type shared by every kgdash crate.

use thiserror::Error;

/// Result alias used throughout kgdash.
pub type VizResult<T> = std::result::Result<T, VizError>;

/// Errors raised by the query, render and collaborator layers.
///
/// Visualization entry points rarely surface these: a failed graph query
/// degrades to an empty result and is only logged. Input validation and the
/// HTTP collaborators do return them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VizError {
    /// Caller supplied an argument outside its domain.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong.
        message: String,
    },

    /// The graph database rejected or failed to run a query.
    #[error("query failed: {message}")]
    Query {
        /// Server or driver message.
        message: String,
    },

    /// Connection-level failure (refused, DNS, timeout).
    #[error("transport error: {message}")]
    Transport {
        /// Underlying transport message.
        message: String,
    },

    /// Remote service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// JSON or TOML (de)serialization failure.
    #[error("serialization error: {message}")]
    Serialization {
        /// Parser message.
        message: String,
    },

    /// Filesystem failure while writing or reading a render artifact.
    #[error("I/O error: {message}")]
    Io {
        /// OS message.
        message: String,
    },

    /// Configuration file could not be loaded.
    #[error("configuration error: {message}")]
    Config {
        /// What failed.
        message: String,
    },
}

impl VizError {
    /// Build an [`VizError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        VizError::InvalidInput {
            message: message.into(),
        }
    }

    /// Build a [`VizError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        VizError::Query {
            message: message.into(),
        }
    }

    /// Build a [`VizError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        VizError::Transport {
            message: message.into(),
        }
    }

    /// Build a [`VizError::Serialization`].
    pub fn serialization(message: impl Into<String>) -> Self {
        VizError::Serialization {
            message: message.into(),
        }
    }

    /// Build a [`VizError::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        VizError::Config {
            message: message.into(),
        }
    }

    /// True for failures where the remote side was never reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, VizError::Transport { .. })
    }
}

impl From<std::io::Error> for VizError {
    fn from(err: std::io::Error) -> Self {
        VizError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        VizError::serialization(err.to_string())
    }
}
