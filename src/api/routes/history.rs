//! History handlers.

use super::HistoryQuery;
use crate::api::AppState;
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

/// GET /history - Completed downloads, newest first
#[utoipa::path(
    get,
    path = "/api/v1/history",
    tag = "history",
    params(
        ("limit" = Option<usize>, Query, description = "Maximum number of items to return"),
        ("type" = Option<String>, Query, description = "Filter by media type (video/audio)")
    ),
    responses(
        (status = 200, description = "Download history", body = Vec<crate::types::HistoryItem>),
        (status = 400, description = "Invalid query parameters")
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let items: Vec<_> = state
        .downloader
        .history()
        .into_iter()
        .filter(|item| query.media_type.is_none_or(|t| item.media_type == t))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();

    Json(items)
}
