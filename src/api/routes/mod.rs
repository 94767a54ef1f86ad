//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`session`] - Analysis, download start/cancel, state, catalog, recommendations
//! - [`history`] - Completed downloads
//! - [`system`] - Health, events, OpenAPI, shutdown

use serde::{Deserialize, Serialize};

use crate::types::{MetadataSource, VideoMetadata};

mod history;
mod session;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use history::*;
pub use session::*;
pub use system::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Request body for POST /analyze
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AnalyzeRequest {
    /// Media URL to analyze (surrounding whitespace is ignored)
    pub url: String,
}

/// Response for POST /analyze
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AnalyzeResponse {
    /// Stored metadata
    pub metadata: VideoMetadata,
    /// Whether the metadata is a genuine or fallback result
    pub source: MetadataSource,
}

/// Query parameters for GET /recommendations
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecommendationQuery {
    /// Topic to find related suggestions for
    pub topic: String,
}

/// Response for GET /recommendations
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecommendationResponse {
    /// Trimmed topic that was asked about
    pub topic: String,
    /// Free-form suggestion text
    pub recommendations: String,
}

/// Query parameters for GET /history
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct HistoryQuery {
    /// Maximum number of items to return (default: all)
    pub limit: Option<usize>,
    /// Only entries of this media type ("video" or "audio")
    #[serde(rename = "type")]
    pub media_type: Option<crate::types::MediaType>,
}
