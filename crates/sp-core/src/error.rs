//! Unified error type for sceneprep.
//!
//! Per-item problems (empty folders, missing languages, undecodable heights)
//! are not errors; they are reported as skip reasons or degraded values by the
//! components that hit them. [`Error`] is reserved for failures the caller has
//! to act on.

/// Unified error type covering the fatal failure modes of sceneprep.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool (ffprobe, mediainfo) returned an error.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Media probing failed.
    #[error("Probe error: {0}")]
    Probe(String),

    /// The catalog collaborator could not be queried or returned garbage.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Input or configuration failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The batch was cancelled before every worker finished.
    #[error("Interrupted: {0}")]
    Interrupted(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Catalog`].
    pub fn catalog(message: impl Into<String>) -> Self {
        Error::Catalog(message.into())
    }

    /// Whether this error should abort a whole batch rather than one item.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Error::Catalog(_) | Error::Interrupted(_))
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
