//! Error types for smart-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (state machine, analysis, configuration)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for smart-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for smart-dl
///
/// Analysis failures never reach callers of the session commands (they are
/// recovered with the fallback record), so most variants here describe
/// rejected commands or infrastructure failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "simulator.step")
        key: Option<String>,
    },

    /// Submitted URL is empty or whitespace-only
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Other rejected input (e.g., empty recommendation topic)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Command received outside its source state
    #[error("cannot {operation} while {current_state}")]
    InvalidState {
        /// The operation that was attempted (e.g., "submit", "cancel download")
        operation: String,
        /// The current status that prevents the operation
        current_state: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Shutdown in progress - not accepting new commands
    #[error("shutdown in progress: not accepting new commands")]
    ShuttingDown,

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn invalid_state(
        operation: impl Into<String>,
        current_state: impl std::fmt::Display,
    ) -> Self {
        Error::InvalidState {
            operation: operation.into(),
            current_state: current_state.to_string(),
        }
    }
}

/// Errors reported by an [`AnalysisClient`](crate::analysis::AnalysisClient)
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No API credential configured
    #[error("no API credential configured (set GEMINI_API_KEY or API_KEY)")]
    MissingCredential,

    /// Request could not be sent or the response body could not be read
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("service returned status {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body (possibly truncated)
        body: String,
    },

    /// The service answered without any candidate text
    #[error("response contained no content")]
    EmptyResponse,

    /// The candidate text was not the expected JSON document
    #[error("malformed analysis payload: {0}")]
    Malformed(String),

    /// A required field was missing or empty
    #[error("analysis payload missing required field '{0}'")]
    MissingField(&'static str),
}

impl AnalysisError {
    /// Whether a later attempt might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            AnalysisError::Transport(e) => e.is_timeout() || e.is_connect(),
            // Rate limited or server-side trouble
            AnalysisError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            // The model occasionally returns an empty candidate list
            AnalysisError::EmptyResponse => true,
            AnalysisError::MissingCredential
            | AnalysisError::Malformed(_)
            | AnalysisError::MissingField(_) => false,
        }
    }
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "invalid_state",
///     "message": "cannot submit while downloading",
///     "details": {
///       "operation": "submit",
///       "current_state": "downloading"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "invalid_url", "invalid_state")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - invalid input
            Error::Config { .. } => 400,
            Error::InvalidUrl(_) => 400,
            Error::InvalidInput(_) => 400,

            // 409 Conflict - command not valid in the current status
            Error::InvalidState { .. } => 409,

            // 502 Bad Gateway - outbound HTTP client failures
            Error::Network(_) => 502,

            // 503 Service Unavailable
            Error::ShuttingDown => 503,

            // 500 Internal Server Error
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::InvalidUrl(_) => "invalid_url",
            Error::InvalidInput(_) => "invalid_input",
            Error::InvalidState { .. } => "invalid_state",
            Error::Io(_) => "io_error",
            Error::ShuttingDown => "shutting_down",
            Error::Network(_) => "network_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::InvalidState {
                operation,
                current_state,
            } => Some(serde_json::json!({
                "operation": operation,
                "current_state": current_state,
            })),
            Error::Config {
                key: Some(key), ..
            } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
