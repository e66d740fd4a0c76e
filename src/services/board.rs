//! Board aggregation.
//!
//! Read-side projection only: no matching, no mutation.

use crate::models::{Board, Order, OrderAction};
use crate::store::{OrderRepository, StoreError};
use std::sync::Arc;

/// Builds display-ready board snapshots from live resting orders.
pub struct BoardAggregator {
    repo: Arc<dyn OrderRepository>,
}

impl BoardAggregator {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// Assemble the live board, stamped with the caller's view of the latest
    /// traded price.
    ///
    /// The two side reads touch disjoint rows and run concurrently; if either
    /// fails the whole aggregation fails, the sibling read is cancelled at
    /// the join, and no partial board escapes.
    pub async fn build(&self, latest_price: i64) -> Result<Board, StoreError> {
        let (buy_orders, sell_orders): (Vec<Order>, Vec<Order>) = tokio::try_join!(
            self.repo.live_orders(OrderAction::Buy),
            self.repo.live_orders(OrderAction::Sell),
        )?;

        Ok(Board {
            latest_price,
            buy_orders,
            sell_orders,
        })
    }
}
