use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Poll engine error: {0}")]
    Poll(#[from] vane_poll::PollError),

    #[error("Logging error: {0}")]
    Logging(#[from] vane_poll::logging::LoggingError),
}

impl SdkError {
    /// Whether this is a missing/unreadable configuration source
    ///
    /// Callers typically react by rebuilding with the weather flow
    /// disabled rather than crashing.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(
            self,
            SdkError::Poll(vane_poll::PollError::SourceUnavailable { .. })
        )
    }
}
