//! Error types for the call-filtering engine

use thiserror::Error;

/// Failures raised by external lookup collaborators.
///
/// These never reach the graph caller: every concrete filter recovers
/// fail-open, so a broken collaborator can degrade a verdict but never
/// block delivery of one.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Directory or contacts lookup failed
    #[error("lookup failed: {0}")]
    LookupFailed(String),

    /// Collaborator is not reachable
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Binding to an external screening service failed
    #[error("bind failed: {0}")]
    BindFailed(String),

    /// Screening service disconnected before answering
    #[error("service disconnected: {0}")]
    Disconnected(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for collaborator lookups
pub type FilterResult<T> = Result<T, FilterError>;
