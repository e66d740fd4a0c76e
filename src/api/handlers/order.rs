//! Order mutation endpoints.

use crate::api::error::ApiError;
use crate::api::middleware::RequestId;
use crate::models::OrderAction;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct MakeOrderRequest {
    pub action: OrderAction,
    pub price: i64,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct TakeOrderRequest {
    pub action: OrderAction,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct TakeOrderResponse {
    /// Price of the last resting order consumed; null when nothing matched.
    pub execution_price: Option<i64>,
    pub filled: i64,
    pub requested: i64,
}

/// POST /orders/make
pub async fn make_order(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<MakeOrderRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .make(req.action, req.price, req.quantity)
        .await
        .map_err(|err| ApiError::from_order(err, request_id.0))?;

    Ok(StatusCode::CREATED)
}

/// PATCH /orders/take
pub async fn take_order(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<TakeOrderRequest>,
) -> Result<Json<TakeOrderResponse>, ApiError> {
    let fill = state
        .service
        .take(req.action, req.quantity)
        .await
        .map_err(|err| ApiError::from_order(err, request_id.0))?;

    Ok(Json(TakeOrderResponse {
        execution_price: fill.execution_price,
        filled: fill.filled,
        requested: fill.requested,
    }))
}

/// DELETE /orders/{order_id}
pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .delete(order_id)
        .await
        .map_err(|err| ApiError::from_order(err, request_id.0))?;

    Ok(StatusCode::NO_CONTENT)
}
