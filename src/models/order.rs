//! Order and board models.
//!
//! Orders are the durable rows of the book; the board is a derived snapshot
//! assembled on the read path and served through the cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    /// Bid for quantity at a price.
    Buy,
    /// Offer quantity at a price.
    Sell,
}

impl OrderAction {
    /// The side a take against this action consumes.
    pub fn opposite(&self) -> Self {
        match self {
            OrderAction::Buy => OrderAction::Sell,
            OrderAction::Sell => OrderAction::Buy,
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderAction::Buy => write!(f, "buy"),
            OrderAction::Sell => write!(f, "sell"),
        }
    }
}

impl std::str::FromStr for OrderAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(OrderAction::Buy),
            "sell" => Ok(OrderAction::Sell),
            _ => Err(format!("Invalid order action: {}", s)),
        }
    }
}

/// Which board view to assemble. Only `Live` is implemented; the other
/// variants are reserved and rejected with an unsupported error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardType {
    #[default]
    Live,
    History,
    Removed,
}

impl fmt::Display for BoardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardType::Live => write!(f, "live"),
            BoardType::History => write!(f, "history"),
            BoardType::Removed => write!(f, "removed"),
        }
    }
}

/// A resting order awaiting a matching counter-order.
///
/// Invariant: `quantity > 0` for every order visible in the repository.
/// Matching reduces quantity in place or deletes the row; nothing ever
/// persists a zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub action: OrderAction,
    pub price: i64,
    pub quantity: i64,
    /// Creation time, the time-priority tiebreak for matching and display.
    pub created_at: DateTime<Utc>,
}

/// Deserialize a possibly-null order list into an explicit empty vector so
/// consumers can iterate unconditionally.
fn nullable_orders<'de, D>(deserializer: D) -> Result<Vec<Order>, D::Error>
where
    D: Deserializer<'de>,
{
    let orders = Option::<Vec<Order>>::deserialize(deserializer)?;
    Ok(orders.unwrap_or_default())
}

/// Display-ready snapshot of the book: both open sides plus the price of the
/// most recent trade. Derived, never persisted; staleness is bounded by the
/// board cache TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub latest_price: i64,
    #[serde(default, deserialize_with = "nullable_orders")]
    pub buy_orders: Vec<Order>,
    #[serde(default, deserialize_with = "nullable_orders")]
    pub sell_orders: Vec<Order>,
}
