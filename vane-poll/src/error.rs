//! Error types for the vane-poll crate.

use std::path::PathBuf;

/// Errors that can occur while loading configuration or refreshing a
/// polled variable.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// A configuration source could not be read at all
    ///
    /// Propagated to the caller: downstream flows depend on the keys in
    /// the source, so this must never degrade into a silently empty map.
    #[error("Source unavailable: {path}: {source}")]
    SourceUnavailable {
        /// The path that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A producer or postprocess step failed during a poll tick
    ///
    /// Swallowed at the tick level: the cell keeps its previous value.
    #[error("Refresh failed: {0}")]
    RefreshFailed(String),

    /// A fetch completed but its body could not be interpreted
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// An HTTP request completed with a non-success status
    #[error("Non-success HTTP status: {0}")]
    HttpStatus(u16),

    /// A required configuration key is missing
    #[error("Missing required key: {0}")]
    MissingKey(String),

    /// Poll intervals must be strictly positive
    #[error("Poll interval must be greater than zero")]
    InvalidInterval,

    /// A collaborator could not be constructed
    #[error("Initialization failed: {0}")]
    Init(String),
}

/// Convenience type alias for Results using PollError.
pub type Result<T> = std::result::Result<T, PollError>;
