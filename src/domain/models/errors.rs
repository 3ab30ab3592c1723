use thiserror::Error;

/// Closed set of failure kinds surfaced by services. Nothing in the client
/// throws past its public boundary; callers render these as transient status
/// messages.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Authorization(String),
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl AppError {
    pub fn network(err: impl ToString) -> AppError {
        return AppError::Network(err.to_string());
    }
}
