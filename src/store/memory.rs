//! In-memory order repository used by service and aggregator tests.
//!
//! Shares [`plan_take`] with the Postgres store; the comparators below mirror
//! the ORDER BY clauses the SQL path uses, so tests exercise the same
//! consumption logic against a mutexed vector.

use super::{OrderRepository, StoreError};
use crate::matching::{plan_take, TakeFill};
use crate::models::{Order, OrderAction};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

/// Newest first, then best price for the taker (cheapest sell, highest buy).
fn sort_for_match(orders: &mut [Order], consumed: OrderAction) {
    orders.sort_by(|a, b| {
        b.created_at.cmp(&a.created_at).then_with(|| match consumed {
            OrderAction::Sell => a.price.cmp(&b.price),
            OrderAction::Buy => b.price.cmp(&a.price),
        })
    });
}

/// Newest first, then price ascending for buys and descending for sells.
fn sort_for_board(orders: &mut [Order], action: OrderAction) {
    orders.sort_by(|a, b| {
        b.created_at.cmp(&a.created_at).then_with(|| match action {
            OrderAction::Buy => a.price.cmp(&b.price),
            OrderAction::Sell => b.price.cmp(&a.price),
        })
    });
}

#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<Vec<Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows, unordered. Test inspection only.
    pub fn snapshot(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderStore {
    async fn live_orders(&self, action: OrderAction) -> Result<Vec<Order>, StoreError> {
        let mut side: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.action == action)
            .cloned()
            .collect();
        sort_for_board(&mut side, action);
        Ok(side)
    }

    async fn make(&self, action: OrderAction, price: i64, quantity: i64) -> Result<(), StoreError> {
        if price <= 0 || quantity <= 0 {
            // Mirrors the CHECK constraints on the orders table.
            return Err(StoreError::InvalidArgument(
                "price and quantity must be positive".into(),
            ));
        }
        self.orders.lock().unwrap().push(Order {
            id: Uuid::new_v4(),
            action,
            price,
            quantity,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn take(&self, action: OrderAction, quantity: i64) -> Result<TakeFill, StoreError> {
        let consumed = action.opposite();
        let mut orders = self.orders.lock().unwrap();

        let mut resting: Vec<Order> =
            orders.iter().filter(|o| o.action == consumed).cloned().collect();
        sort_for_match(&mut resting, consumed);

        let plan = plan_take(&resting, quantity);

        if let Some((order_id, new_quantity)) = plan.reduce {
            if let Some(order) = orders.iter_mut().find(|o| o.id == order_id) {
                order.quantity = new_quantity;
            }
        }
        orders.retain(|o| !plan.delete.contains(&o.id));

        Ok(plan.fill())
    }

    async fn delete(&self, order_id: Uuid) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().unwrap();
        let before = orders.len();
        orders.retain(|o| o.id != order_id);
        if orders.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn order(action: OrderAction, price: i64, age_secs: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            action,
            price,
            quantity: 1,
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn test_match_ordering_prefers_newest_then_best_price() {
        let mut sells = vec![
            order(OrderAction::Sell, 50, 60),
            order(OrderAction::Sell, 70, 0),
            order(OrderAction::Sell, 60, 0),
        ];
        // Same timestamp for the two new orders so the price tiebreak is
        // what separates them.
        sells[2].created_at = sells[1].created_at;
        sort_for_match(&mut sells, OrderAction::Sell);
        assert_eq!(
            sells.iter().map(|o| o.price).collect::<Vec<_>>(),
            vec![60, 70, 50]
        );

        let mut buys = vec![
            order(OrderAction::Buy, 5, 60),
            order(OrderAction::Buy, 7, 0),
            order(OrderAction::Buy, 9, 0),
        ];
        buys[2].created_at = buys[1].created_at;
        sort_for_match(&mut buys, OrderAction::Buy);
        assert_eq!(
            buys.iter().map(|o| o.price).collect::<Vec<_>>(),
            vec![9, 7, 5]
        );
    }

    #[test]
    fn test_board_ordering_flips_the_buy_column() {
        let mut buys = vec![
            order(OrderAction::Buy, 9, 0),
            order(OrderAction::Buy, 7, 0),
        ];
        buys[1].created_at = buys[0].created_at;
        sort_for_board(&mut buys, OrderAction::Buy);
        assert_eq!(buys[0].price, 7);

        let mut sells = vec![
            order(OrderAction::Sell, 60, 0),
            order(OrderAction::Sell, 70, 0),
        ];
        sells[1].created_at = sells[0].created_at;
        sort_for_board(&mut sells, OrderAction::Sell);
        assert_eq!(sells[0].price, 70);
    }

    #[tokio::test]
    async fn test_live_orders_filters_and_sorts_per_side() {
        let store = MemoryOrderStore::new();
        store.make(OrderAction::Sell, 60, 1).await.unwrap();
        store.make(OrderAction::Sell, 55, 2).await.unwrap();
        store.make(OrderAction::Buy, 5, 3).await.unwrap();

        let sells = store.live_orders(OrderAction::Sell).await.unwrap();
        assert_eq!(sells.len(), 2);
        // Newest first.
        assert_eq!(sells[0].price, 55);

        let buys = store.live_orders(OrderAction::Buy).await.unwrap();
        assert_eq!(buys.len(), 1);
    }

    #[tokio::test]
    async fn test_make_rejects_non_positive_rows() {
        let store = MemoryOrderStore::new();
        assert!(matches!(
            store.make(OrderAction::Buy, 0, 5).await,
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.make(OrderAction::Buy, 5, -1).await,
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_take_reduces_then_deletes() {
        let store = MemoryOrderStore::new();
        store.make(OrderAction::Sell, 50, 10).await.unwrap();

        let fill = store.take(OrderAction::Buy, 2).await.unwrap();
        assert_eq!(fill.execution_price, Some(50));
        assert_eq!(fill.filled, 2);
        assert_eq!(store.snapshot()[0].quantity, 8);

        let fill = store.take(OrderAction::Buy, 8).await.unwrap();
        assert!(fill.drained);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_order_is_not_found() {
        let store = MemoryOrderStore::new();
        assert!(matches!(
            store.delete(Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
    }
}
