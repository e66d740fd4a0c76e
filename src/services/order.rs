//! Order book service.
//!
//! Owns the one piece of true shared mutable state in the system: the latest
//! traded price, guarded by the same lock that serializes every
//! book-mutating operation. The lock covers the repository work and the
//! price update only; notification dispatch and cache write-back happen on
//! detached tasks after it is released.

use crate::cache::{keys, BoardCache};
use crate::matching::TakeFill;
use crate::models::{Board, BoardType, OrderAction, OrderError};
use crate::mq::{self, Notification};
use crate::services::board::BoardAggregator;
use crate::store::OrderRepository;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, warn};
use uuid::Uuid;

pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    board: BoardAggregator,
    cache: Arc<dyn BoardCache>,
    notifications: mpsc::Sender<Notification>,
    /// Latest traded price. The mutex doubles as the critical-section guard
    /// for make/take/delete, so observers always see a fully applied trade.
    latest_price: Mutex<i64>,
    /// Price the book falls back to when a take drains the opposing side.
    default_price: i64,
    board_cache_ttl: Duration,
}

impl OrderService {
    pub fn new(
        repo: Arc<dyn OrderRepository>,
        cache: Arc<dyn BoardCache>,
        notifications: mpsc::Sender<Notification>,
        default_price: i64,
        board_cache_ttl: Duration,
    ) -> Self {
        Self {
            board: BoardAggregator::new(Arc::clone(&repo)),
            repo,
            cache,
            notifications,
            latest_price: Mutex::new(default_price),
            default_price,
            board_cache_ttl,
        }
    }

    /// Current latest traded price.
    pub async fn latest_price(&self) -> i64 {
        *self.latest_price.lock().await
    }

    /// Board read path: cache-aside with asynchronous repopulation.
    ///
    /// Returns the board plus the continuation token, which is reserved and
    /// always empty for now.
    pub async fn get_board(&self, board_type: BoardType) -> Result<(Board, String), OrderError> {
        let key = match board_type {
            BoardType::Live => keys::board(board_type),
            other => {
                return Err(OrderError::Unsupported(format!(
                    "board type {other} is not available yet"
                )))
            }
        };

        match self.cache.get_board(&key).await {
            Ok(Some(board)) => {
                counter!("orderboard_board_cache_hits_total").increment(1);
                Ok((board, String::new()))
            }
            Ok(None) => {
                counter!("orderboard_board_cache_misses_total").increment(1);

                let latest_price = self.latest_price().await;
                let board = self.board.build(latest_price).await?;

                // Return-then-write: the caller gets the board immediately,
                // the cache catches up on a detached task.
                let cache = Arc::clone(&self.cache);
                let snapshot = board.clone();
                let ttl = self.board_cache_ttl;
                tokio::spawn(async move {
                    if let Err(err) = cache.set_board(&key, &snapshot, ttl).await {
                        error!("board cache write-back failed: {}", err);
                    }
                });

                Ok((board, String::new()))
            }
            // A real cache failure is not a miss; recomputing here would
            // hide an outage behind elevated database load.
            Err(err) => Err(err.into()),
        }
    }

    /// Insert a resting order.
    ///
    /// A buy must rest strictly below the latest traded price and a sell
    /// strictly above it, so a fresh order can never cross the book against
    /// the last trade.
    pub async fn make(
        &self,
        action: OrderAction,
        price: i64,
        quantity: i64,
    ) -> Result<(), OrderError> {
        if price <= 0 {
            return Err(OrderError::InvalidArgument(format!(
                "price must be positive, got {price}"
            )));
        }
        if quantity <= 0 {
            return Err(OrderError::InvalidArgument(format!(
                "quantity must be positive, got {quantity}"
            )));
        }

        {
            let latest_price = self.latest_price.lock().await;
            match action {
                OrderAction::Buy if price >= *latest_price => {
                    return Err(OrderError::InvalidPrice(format!(
                        "price to buy {price} should be lower than latest price {latest_price}"
                    )));
                }
                OrderAction::Sell if price <= *latest_price => {
                    return Err(OrderError::InvalidPrice(format!(
                        "price to sell {price} should be higher than latest price {latest_price}"
                    )));
                }
                _ => {}
            }

            self.repo.make(action, price, quantity).await?;
        }

        counter!("orderboard_orders_made_total").increment(1);
        self.notify("your order has been created");
        Ok(())
    }

    /// Consume resting orders opposite to `action`, up to `quantity`.
    ///
    /// The latest price moves to the price of the last resting order touched;
    /// draining the opposing side resets it to the default, and a take that
    /// matched nothing leaves it unchanged. When liquidity runs out the fill
    /// reports the shortfall rather than resting the remainder.
    pub async fn take(&self, action: OrderAction, quantity: i64) -> Result<TakeFill, OrderError> {
        if quantity <= 0 {
            return Err(OrderError::InvalidArgument(format!(
                "quantity must be positive, got {quantity}"
            )));
        }

        let fill = {
            let mut latest_price = self.latest_price.lock().await;
            let fill = self.repo.take(action, quantity).await?;
            if fill.filled > 0 {
                *latest_price = if fill.drained {
                    self.default_price
                } else {
                    fill.execution_price.unwrap_or(self.default_price)
                };
            }
            fill
        };

        if fill.is_partial() {
            warn!(
                requested = fill.requested,
                filled = fill.filled,
                "take exhausted resting liquidity"
            );
        }
        counter!("orderboard_orders_taken_total").increment(1);
        if fill.filled > 0 {
            self.notify("your order has been fulfilled");
        }
        Ok(fill)
    }

    /// Cancel a resting order by id.
    pub async fn delete(&self, order_id: Uuid) -> Result<(), OrderError> {
        {
            let _latest_price = self.latest_price.lock().await;
            self.repo.delete(order_id).await?;
        }
        counter!("orderboard_orders_deleted_total").increment(1);
        Ok(())
    }

    // TODO: route notifications to the order's creator once orders carry
    // ownership; until then the recipients are fixed placeholders.
    fn notify(&self, content: &str) {
        mq::dispatch(
            &self.notifications,
            Notification::Mail {
                address: "user@example.com".into(),
                content: content.into(),
            },
        );
        mq::dispatch(
            &self.notifications,
            Notification::Sms {
                number: "0911122233".into(),
                content: content.into(),
            },
        );
    }
}
