use axum::routing::{delete, get, patch, post};
use axum::Router;
use std::sync::Arc;

use crate::api::handlers;
use crate::AppState;

/// Order book routes, nested under the API prefix by the caller.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/board", get(handlers::board::get_board))
        .route("/orders/make", post(handlers::order::make_order))
        .route("/orders/take", patch(handlers::order::take_order))
        .route("/orders/:order_id", delete(handlers::order::delete_order))
}
