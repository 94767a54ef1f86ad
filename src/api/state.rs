//! Application state for the API server

use crate::{Config, SmartDownloader};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// The session controller
    pub downloader: Arc<SmartDownloader>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(downloader: Arc<SmartDownloader>, config: Arc<Config>) -> Self {
        Self { downloader, config }
    }
}
