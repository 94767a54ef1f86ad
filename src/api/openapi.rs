//! OpenAPI documentation and schema generation
//!
//! Defines the OpenAPI specification for the smart-dl REST API using utoipa
//! for compile-time document generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the smart-dl REST API
///
/// The document can be accessed via:
/// - `/api/v1/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "smart-dl REST API",
        version = "0.1.0",
        description = "Analyze media URLs, run simulated downloads and follow the session over server-sent events",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:6790/api/v1", description = "Local development server")
    ),
    paths(
        // Session
        crate::api::routes::analyze,
        crate::api::routes::start_download,
        crate::api::routes::cancel_download,
        crate::api::routes::get_state,
        crate::api::routes::get_catalog,
        crate::api::routes::get_recommendations,

        // History
        crate::api::routes::get_history,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
        crate::api::routes::shutdown,
    ),
    components(schemas(
        // Core types from types.rs
        crate::status::AppStatus,
        crate::types::MediaFormat,
        crate::types::MediaType,
        crate::types::DownloadOption,
        crate::types::VideoMetadata,
        crate::types::MetadataSource,
        crate::types::HistoryId,
        crate::types::HistoryStatus,
        crate::types::HistoryItem,
        crate::types::SessionSnapshot,
        crate::types::Event,

        // Config types from config.rs
        crate::config::Config,
        crate::config::AnalysisConfig,
        crate::config::RetryConfig,
        crate::config::SimulatorConfig,
        crate::config::SessionConfig,
        crate::config::FallbackConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        // API request/response types from routes
        crate::api::routes::AnalyzeRequest,
        crate::api::routes::AnalyzeResponse,
        crate::api::routes::RecommendationQuery,
        crate::api::routes::RecommendationResponse,
        crate::api::routes::HistoryQuery,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "session", description = "Session - Analyze a URL, start or cancel the simulated download, read state"),
        (name = "history", description = "Download history - Completed simulated downloads, newest first"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, events, shutdown"),
    )
)]
pub struct ApiDoc;
