//! # smart-dl
//!
//! Orchestration core for an AI-assisted media downloader front-end.
//!
//! A session analyzes a pasted URL with a hosted language model (falling back
//! to a fixed record when the call fails), offers a fixed catalog of download
//! options, runs a timer-driven simulated download and keeps a newest-first
//! history of finished runs. Nothing is actually fetched or transcoded.
//!
//! ## Design
//!
//! - **One controller** - [`SmartDownloader`] owns status, metadata, progress
//!   and history behind a single lock and accepts three commands:
//!   [`submit`](SmartDownloader::submit),
//!   [`select_download_option`](SmartDownloader::select_download_option) and
//!   [`cancel_download`](SmartDownloader::cancel_download)
//! - **Event-driven** - consumers subscribe to [`Event`]s, no polling required
//! - **Pluggable analysis** - any [`AnalysisClient`] can replace the hosted one
//!
//! ## Quick Start
//!
//! ```no_run
//! use smart_dl::{Config, DownloadOption, SmartDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY / API_KEY; without one the fallback record is used
//!     let downloader = SmartDownloader::new(Config::from_env())?;
//!
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let stored = downloader.submit("https://example.com/watch?v=42").await?;
//!     println!("{} ({:?})", stored.metadata.title, stored.source);
//!
//!     let option = DownloadOption::catalog().remove(2);
//!     downloader.select_download_option(option)?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Remote content analysis
pub mod analysis;
/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Session controller (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// In-memory history ledger
pub mod history;
/// Current metadata holder
pub mod metadata;
/// Retry logic with exponential backoff
pub mod retry;
/// Timer-driven download simulation
pub mod simulator;
/// Application status machine
pub mod status;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use analysis::{AnalysisClient, AnalysisResult, GeminiClient};
pub use config::Config;
pub use downloader::SmartDownloader;
pub use error::{AnalysisError, ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use metadata::StoredMetadata;
pub use status::AppStatus;
pub use types::{
    DownloadOption, Event, HistoryId, HistoryItem, HistoryStatus, MediaFormat, MediaType,
    MetadataSource, SessionSnapshot, VideoMetadata,
};

/// Wait for a termination signal, then shut the controller down.
///
/// - **Unix:** SIGTERM or SIGINT
/// - **Other:** Ctrl+C
///
/// # Example
///
/// ```no_run
/// use smart_dl::{Config, SmartDownloader, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = Arc::new(SmartDownloader::new(Config::from_env())?);
///     let _server = downloader.spawn_api_server();
///
///     run_with_shutdown(&downloader).await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: &SmartDownloader) -> Result<()> {
    wait_for_signal().await;
    downloader.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration can fail in restricted environments
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for Ctrl+C only");
            wait_for_ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
        _ = wait_for_ctrl_c() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
            std::future::pending::<()>().await;
        }
    }
}
