//! Session handlers: analysis, simulated download control, state.

use super::{AnalyzeRequest, AnalyzeResponse, RecommendationQuery, RecommendationResponse};
use crate::api::AppState;
use crate::types::DownloadOption;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

/// POST /analyze - Submit a URL for analysis
///
/// Responds once the analysis has resolved. A failed remote analysis still
/// answers 200 with `source: "fallback"`.
#[utoipa::path(
    post,
    path = "/api/v1/analyze",
    tag = "session",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis resolved", body = AnalyzeResponse),
        (status = 400, description = "Empty URL", body = crate::error::ApiError),
        (status = 409, description = "Analysis or download already in progress", body = crate::error::ApiError),
        (status = 503, description = "Shutting down", body = crate::error::ApiError)
    )
)]
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    match state.downloader.submit(&request.url).await {
        Ok(stored) => (
            StatusCode::OK,
            Json(AnalyzeResponse {
                metadata: stored.metadata,
                source: stored.source,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /download - Start a simulated download
#[utoipa::path(
    post,
    path = "/api/v1/download",
    tag = "session",
    request_body = DownloadOption,
    responses(
        (status = 202, description = "Download started", body = crate::types::SessionSnapshot),
        (status = 409, description = "No analyzed item, or a download is already running", body = crate::error::ApiError),
        (status = 503, description = "Shutting down", body = crate::error::ApiError)
    )
)]
pub async fn start_download(
    State(state): State<AppState>,
    Json(option): Json<DownloadOption>,
) -> impl IntoResponse {
    match state.downloader.select_download_option(option) {
        Ok(()) => (StatusCode::ACCEPTED, Json(state.downloader.snapshot())).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /download/cancel - Cancel the running simulated download
#[utoipa::path(
    post,
    path = "/api/v1/download/cancel",
    tag = "session",
    responses(
        (status = 200, description = "Download cancelled", body = crate::types::SessionSnapshot),
        (status = 409, description = "No download running", body = crate::error::ApiError)
    )
)]
pub async fn cancel_download(State(state): State<AppState>) -> impl IntoResponse {
    match state.downloader.cancel_download() {
        Ok(()) => (StatusCode::OK, Json(state.downloader.snapshot())).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /state - Current session snapshot
#[utoipa::path(
    get,
    path = "/api/v1/state",
    tag = "session",
    responses(
        (status = 200, description = "Session snapshot", body = crate::types::SessionSnapshot)
    )
)]
pub async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.downloader.snapshot())
}

/// GET /catalog - Download options offered for an analyzed item
#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    tag = "session",
    responses(
        (status = 200, description = "Download options", body = Vec<DownloadOption>)
    )
)]
pub async fn get_catalog(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.downloader.catalog())
}

/// GET /recommendations - Topics related to a subject
#[utoipa::path(
    get,
    path = "/api/v1/recommendations",
    tag = "session",
    params(
        ("topic" = String, Query, description = "Subject to find related topics for")
    ),
    responses(
        (status = 200, description = "Suggestions (or the no-recommendations text)", body = RecommendationResponse),
        (status = 400, description = "Empty topic", body = crate::error::ApiError)
    )
)]
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<RecommendationResponse>, crate::error::Error> {
    let recommendations = state.downloader.recommend(&query.topic).await?;
    Ok(Json(RecommendationResponse {
        topic: query.topic.trim().to_string(),
        recommendations,
    }))
}
