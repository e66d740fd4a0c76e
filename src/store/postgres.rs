//! Postgres order repository.

use super::{parse_error, OrderRepository, StoreError};
use crate::matching::{board_order_by, match_order_by, plan_take, TakeFill};
use crate::models::{Order, OrderAction};
use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

/// Order repository backed by the `orders` table.
pub struct PgOrderStore {
    pool: PgPool,
    /// Deadline for the matching transaction; on expiry the transaction is
    /// dropped, which rolls it back.
    take_timeout: Duration,
}

impl PgOrderStore {
    pub fn new(pool: PgPool, take_timeout: Duration) -> Self {
        Self { pool, take_timeout }
    }

    /// The matching pass: lock the opposing side in matching order, compute
    /// the plan, apply it as one batched update plus one batched delete,
    /// commit.
    async fn take_in_tx(
        &self,
        action: OrderAction,
        quantity: i64,
    ) -> Result<TakeFill, StoreError> {
        let consumed = action.opposite();
        let mut tx = self.pool.begin().await.map_err(parse_error)?;

        let query = format!(
            "SELECT id, action, price, quantity, created_at \
             FROM orders WHERE action = $1 ORDER BY {} FOR UPDATE",
            match_order_by(consumed)
        );
        let resting: Vec<Order> = sqlx::query_as(&query)
            .bind(consumed)
            .fetch_all(&mut *tx)
            .await
            .map_err(parse_error)?;

        let plan = plan_take(&resting, quantity);

        if let Some((order_id, new_quantity)) = plan.reduce {
            sqlx::query("UPDATE orders SET quantity = $1 WHERE id = $2")
                .bind(new_quantity)
                .bind(order_id)
                .execute(&mut *tx)
                .await
                .map_err(parse_error)?;
        }
        if !plan.delete.is_empty() {
            sqlx::query("DELETE FROM orders WHERE id = ANY($1)")
                .bind(&plan.delete[..])
                .execute(&mut *tx)
                .await
                .map_err(parse_error)?;
        }

        tx.commit().await.map_err(parse_error)?;
        Ok(plan.fill())
    }
}

#[async_trait]
impl OrderRepository for PgOrderStore {
    async fn live_orders(&self, action: OrderAction) -> Result<Vec<Order>, StoreError> {
        let query = format!(
            "SELECT id, action, price, quantity, created_at \
             FROM orders WHERE action = $1 ORDER BY {}",
            board_order_by(action)
        );
        sqlx::query_as(&query)
            .bind(action)
            .fetch_all(&self.pool)
            .await
            .map_err(parse_error)
    }

    async fn make(&self, action: OrderAction, price: i64, quantity: i64) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO orders (action, price, quantity) VALUES ($1, $2, $3)")
            .bind(action)
            .bind(price)
            .bind(quantity)
            .execute(&self.pool)
            .await
            .map_err(parse_error)?;
        Ok(())
    }

    async fn take(&self, action: OrderAction, quantity: i64) -> Result<TakeFill, StoreError> {
        match tokio::time::timeout(self.take_timeout, self.take_in_tx(action, quantity)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        }
    }

    async fn delete(&self, order_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(parse_error)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
