//! API handlers.

pub mod board;
pub mod order;
pub mod probes;

use serde::Serialize;

/// Paged response envelope. `next` is the opaque continuation token,
/// reserved for future pagination and currently always empty.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub data: T,
    pub next: String,
}
