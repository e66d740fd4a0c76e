//! Price-time matcher.
//!
//! Given a snapshot of the resting opposing side in matching order, computes
//! a [`MatchPlan`]: which single order to reduce, which orders to delete, and
//! the resulting execution price. The plan is pure data, so the repository
//! can apply it as one batched UPDATE plus one batched DELETE inside a single
//! transaction instead of a statement per row.
//!
//! Ordering policy: resting orders are consumed newest-first, then best price
//! for the taker (cheapest sell, highest buy). This mirrors the ordering the
//! board displays rather than classical best-price/oldest-first priority.

use crate::models::{Order, OrderAction};
use uuid::Uuid;

/// `ORDER BY` clause for the side a take consumes: newest first, then best
/// price for the taker.
pub fn match_order_by(consumed: OrderAction) -> &'static str {
    match consumed {
        OrderAction::Sell => "created_at DESC, price ASC",
        OrderAction::Buy => "created_at DESC, price DESC",
    }
}

/// `ORDER BY` clause for board display of one side: newest first, then price
/// ascending for buys and descending for sells.
pub fn board_order_by(action: OrderAction) -> &'static str {
    match action {
        OrderAction::Buy => "created_at DESC, price ASC",
        OrderAction::Sell => "created_at DESC, price DESC",
    }
}

/// Write intents produced by one matching pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPlan {
    /// Order partially consumed: `(id, remaining quantity to persist)`.
    /// At most one order is ever reduced, and it ends the pass.
    pub reduce: Option<(Uuid, i64)>,
    /// Orders fully consumed, to be deleted in one batch.
    pub delete: Vec<Uuid>,
    /// Price of the last resting order touched, partially or fully.
    pub last_price: Option<i64>,
    /// Quantity actually consumed.
    pub filled: i64,
    /// Quantity the taker asked for.
    pub requested: i64,
    /// True when the pass consumed every resting order on the side.
    pub drained: bool,
}

impl MatchPlan {
    pub fn fill(&self) -> TakeFill {
        TakeFill {
            execution_price: self.last_price,
            filled: self.filled,
            requested: self.requested,
            drained: self.drained,
        }
    }
}

/// Outcome of a take as seen by callers of the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakeFill {
    /// Price of the last resting order touched; `None` when nothing matched.
    pub execution_price: Option<i64>,
    pub filled: i64,
    pub requested: i64,
    /// True when the take emptied the opposing side.
    pub drained: bool,
}

impl TakeFill {
    pub fn is_partial(&self) -> bool {
        self.filled < self.requested
    }
}

/// Walk the resting list greedily, consuming up to `quantity`.
///
/// An order larger than the remaining request is reduced in place and ends
/// the pass; an order of equal or smaller size is marked for deletion and the
/// walk continues. When liquidity runs out first, the shortfall shows up as
/// `filled < requested`; the remainder is never left resting.
pub fn plan_take(resting: &[Order], quantity: i64) -> MatchPlan {
    let mut remaining = quantity;
    let mut reduce = None;
    let mut delete = Vec::new();
    let mut last_price = None;

    for order in resting {
        if remaining == 0 {
            break;
        }
        if order.quantity > remaining {
            reduce = Some((order.id, order.quantity - remaining));
            last_price = Some(order.price);
            remaining = 0;
        } else {
            delete.push(order.id);
            last_price = Some(order.price);
            remaining -= order.quantity;
        }
    }

    let drained = !resting.is_empty() && reduce.is_none() && delete.len() == resting.len();
    MatchPlan {
        reduce,
        delete,
        last_price,
        filled: quantity - remaining,
        requested: quantity,
        drained,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn order(price: i64, quantity: i64, age_secs: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            action: OrderAction::Sell,
            price,
            quantity,
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn test_partial_reduce_stops_the_walk() {
        let resting = vec![order(50, 10, 0)];
        let plan = plan_take(&resting, 2);

        assert_eq!(plan.reduce, Some((resting[0].id, 8)));
        assert!(plan.delete.is_empty());
        assert_eq!(plan.last_price, Some(50));
        assert_eq!(plan.filled, 2);
        assert!(!plan.drained);
    }

    #[test]
    fn test_exact_consume_deletes_and_drains() {
        let resting = vec![order(50, 8, 0)];
        let plan = plan_take(&resting, 8);

        assert_eq!(plan.reduce, None);
        assert_eq!(plan.delete, vec![resting[0].id]);
        assert_eq!(plan.last_price, Some(50));
        assert!(plan.drained);
    }

    #[test]
    fn test_walk_spans_orders_and_reduces_the_last() {
        // Matching order: 5 @ 55 first, then 10 @ 60.
        let resting = vec![order(55, 5, 0), order(60, 10, 10)];
        let plan = plan_take(&resting, 7);

        assert_eq!(plan.delete, vec![resting[0].id]);
        assert_eq!(plan.reduce, Some((resting[1].id, 8)));
        assert_eq!(plan.last_price, Some(60));
        assert_eq!(plan.filled, 7);
        assert!(!plan.drained);
    }

    #[test]
    fn test_full_consume_mid_book_is_not_drained() {
        let resting = vec![order(55, 5, 0), order(60, 10, 10)];
        let plan = plan_take(&resting, 5);

        assert_eq!(plan.delete, vec![resting[0].id]);
        assert_eq!(plan.reduce, None);
        assert!(!plan.drained);
        assert_eq!(plan.last_price, Some(55));
    }

    #[test]
    fn test_insufficient_liquidity_reports_shortfall() {
        let resting = vec![order(50, 3, 0), order(52, 4, 10)];
        let plan = plan_take(&resting, 20);

        assert_eq!(plan.delete.len(), 2);
        assert_eq!(plan.filled, 7);
        assert_eq!(plan.requested, 20);
        assert!(plan.drained);
        assert!(plan.fill().is_partial());
    }

    #[test]
    fn test_empty_book_matches_nothing() {
        let plan = plan_take(&[], 5);

        assert_eq!(plan.last_price, None);
        assert_eq!(plan.filled, 0);
        assert!(!plan.drained);
        assert_eq!(plan.fill().execution_price, None);
    }

    #[test]
    fn test_order_by_clauses_follow_the_policy() {
        assert_eq!(
            match_order_by(OrderAction::Sell),
            "created_at DESC, price ASC"
        );
        assert_eq!(
            match_order_by(OrderAction::Buy),
            "created_at DESC, price DESC"
        );
        // Board shows each side best-price-first for its viewer, which flips
        // the buy column relative to matching.
        assert_eq!(
            board_order_by(OrderAction::Buy),
            "created_at DESC, price ASC"
        );
        assert_eq!(
            board_order_by(OrderAction::Sell),
            "created_at DESC, price DESC"
        );
    }
}
