//! Durable order storage.
//!
//! The repository is the single source of truth for resting orders; the
//! board cache is a derived view and mutating paths never consult it.

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgOrderStore;

use crate::matching::TakeFill;
use crate::models::{Order, OrderAction};
use async_trait::async_trait;
use uuid::Uuid;

/// Storage-layer errors, with constraint violations translated into their
/// domain meaning and everything else left as an opaque database failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("duplicate entry")]
    DuplicateEntry,

    #[error("wrong parameters: {0}")]
    InvalidArgument(String),

    /// The matching transaction exceeded its deadline and was rolled back.
    #[error("transaction deadline exceeded")]
    Timeout,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

/// Translate a sqlx error into the store taxonomy.
///
/// The code branches follow the Postgres error classes: unique violations
/// become duplicates, the remaining integrity-constraint classes are caller
/// mistakes.
pub(crate) fn parse_error(err: sqlx::Error) -> StoreError {
    if matches!(err, sqlx::Error::RowNotFound) {
        return StoreError::NotFound;
    }
    let constraint = err
        .as_database_error()
        .and_then(|db| db.code().map(|code| (code.to_string(), db.message().to_string())));
    match constraint {
        Some((code, message)) => match code.as_str() {
            // unique_violation
            "23505" => StoreError::DuplicateEntry,
            // not_null_violation, foreign_key_violation, string truncation
            "23502" | "23503" | "22001" => StoreError::InvalidArgument(message),
            _ => StoreError::Database(err),
        },
        None => StoreError::Database(err),
    }
}

/// Resting-order storage with an atomic matching pass.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Open orders on one side, in board display order
    /// (newest first, then price ascending for buys, descending for sells).
    async fn live_orders(&self, action: OrderAction) -> Result<Vec<Order>, StoreError>;

    /// Insert a resting order.
    async fn make(&self, action: OrderAction, price: i64, quantity: i64) -> Result<(), StoreError>;

    /// Consume resting orders opposite to `action`, up to `quantity`.
    ///
    /// All reads, reductions and deletions happen in one transaction; either
    /// every effect commits or none do.
    async fn take(&self, action: OrderAction, quantity: i64) -> Result<TakeFill, StoreError>;

    /// Remove a resting order by id. `NotFound` when no such row exists.
    async fn delete(&self, order_id: Uuid) -> Result<(), StoreError>;
}
