//! Board read endpoint.

use super::PageResponse;
use crate::api::error::ApiError;
use crate::api::middleware::RequestId;
use crate::models::{Board, BoardType};
use crate::AppState;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    /// Board variant to read; defaults to the live board.
    #[serde(default)]
    pub board_type: BoardType,
}

/// GET /board
pub async fn get_board(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<PageResponse<Board>>, ApiError> {
    let (board, next) = state
        .service
        .get_board(query.board_type)
        .await
        .map_err(|err| ApiError::from_order(err, request_id.0))?;

    Ok(Json(PageResponse { data: board, next }))
}
