use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    /// The lookup boundary only accepts `YYYY-MM-DD`. Rejected before any
    /// cache or parser work happens.
    #[error("invalid date string: {0:?}")]
    InvalidDate(String),

    /// The scraping collaborator failed. Never cached and never downgraded
    /// to a data-absence outcome.
    #[error("upstream fetch failed: {0}")]
    Upstream(String),

    #[error("upstream fetch timed out after {0:?}")]
    Timeout(Duration),

    /// Cache or repository I/O failure, distinct from a plain miss.
    #[error("storage error: {0}")]
    Store(#[from] shared::Error),
}
