//! Service-level error taxonomy.

use crate::cache::CacheError;
use crate::store::StoreError;

/// Errors surfaced by the order book service.
///
/// Validation failures are produced before any lock is taken or transaction
/// opened; storage and cache failures propagate unchanged, with no automatic
/// retry at this layer.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Bad price, quantity or action in the request itself.
    #[error("{0}")]
    InvalidArgument(String),

    /// Price crosses the sanity rule against the latest traded price.
    #[error("{0}")]
    InvalidPrice(String),

    #[error("order not found")]
    NotFound,

    #[error("duplicate entry")]
    DuplicateEntry,

    /// Requested a board variant that is not implemented.
    #[error("{0}")]
    Unsupported(String),

    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),

    #[error("cache failure: {0}")]
    Cache(#[source] CacheError),
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => OrderError::NotFound,
            StoreError::DuplicateEntry => OrderError::DuplicateEntry,
            StoreError::InvalidArgument(msg) => OrderError::InvalidArgument(msg),
            other => OrderError::Storage(other),
        }
    }
}

impl From<CacheError> for OrderError {
    fn from(err: CacheError) -> Self {
        OrderError::Cache(err)
    }
}
