//! Session controller split into focused submodules.
//!
//! The `SmartDownloader` struct and its methods are organized by domain:
//! - [`analysis`] - URL submission and analysis resolution
//! - [`control`] - Simulated download start/cancel and simulator callbacks
//! - [`recommendations`] - Related-topic suggestions
//! - [`lifecycle`] - Shutdown coordination
//!
//! All session state (status, metadata, progress, history) lives behind one
//! mutex so every read sees a consistent tuple. Lock order is session first,
//! simulator second; simulator callbacks only take the session lock for the
//! run that is still active, which cannot coexist with a caller holding the
//! session lock while starting a new run.

mod analysis;
mod control;
mod lifecycle;
mod recommendations;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;

use crate::analysis::{AnalysisClient, GeminiClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::history::HistoryLedger;
use crate::metadata::{MetadataStore, StoredMetadata};
use crate::simulator::DownloadSimulator;
use crate::status::{AppStatus, SessionEvent};
use crate::types::{DownloadOption, Event, HistoryItem, SessionSnapshot};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Composite session state guarded by a single mutex
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) status: AppStatus,
    pub(crate) metadata: MetadataStore,
    pub(crate) progress: u8,
    pub(crate) is_downloading: bool,
    pub(crate) history: HistoryLedger,
}

impl SessionState {
    pub(crate) fn new(history_limit: Option<usize>) -> Self {
        Self {
            status: AppStatus::Idle,
            metadata: MetadataStore::new(),
            progress: 0,
            is_downloading: false,
            history: HistoryLedger::new(history_limit),
        }
    }

    /// Apply `event` to the status, emitting `StatusChanged` on success.
    ///
    /// Returns the previous status.
    pub(crate) fn transition(
        &mut self,
        event: SessionEvent,
        events: &broadcast::Sender<Event>,
    ) -> Result<AppStatus> {
        let from = self.status;
        let to = from
            .next(event)
            .ok_or_else(|| Error::invalid_state(event.operation(), from))?;

        self.status = to;
        tracing::debug!(%from, %to, "status changed");
        events.send(Event::StatusChanged { from, to }).ok();
        Ok(from)
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        let stored = self.metadata.get();
        SessionSnapshot {
            status: self.status,
            metadata: stored.as_ref().map(|s| s.metadata.clone()),
            metadata_source: stored.as_ref().map(|s| s.source),
            progress: self.progress,
            is_downloading: self.is_downloading,
            history: self.history.list(),
        }
    }
}

pub(crate) fn lock_session(session: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    session
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Main controller instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct SmartDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Remote analysis backend
    pub(crate) client: Arc<dyn AnalysisClient>,
    /// Status, metadata, progress and history
    pub(crate) session: Arc<Mutex<SessionState>>,
    /// Single-run progress simulator
    pub(crate) simulator: DownloadSimulator,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Cleared on shutdown; commands are rejected afterwards
    pub(crate) accepting_new: Arc<AtomicBool>,
}

impl SmartDownloader {
    /// Create a controller backed by the hosted analysis service
    ///
    /// The configuration is validated first. A missing API credential is not
    /// an error: analysis then always resolves to the fallback record.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = GeminiClient::new(&config.analysis)?;
        if config.analysis.credential().is_none() {
            tracing::warn!(
                "no analysis API credential configured, results will use the fallback record"
            );
        }
        Self::with_client(config, Arc::new(client))
    }

    /// Create a controller with a custom [`AnalysisClient`]
    pub fn with_client(config: Config, client: Arc<dyn AnalysisClient>) -> Result<Self> {
        config.validate()?;

        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session = SessionState::new(config.session.history_limit);
        let simulator = DownloadSimulator::new(config.simulator.clone());

        tracing::info!(client = client.name(), "smart downloader initialized");

        Ok(Self {
            config: Arc::new(config),
            client,
            session: Arc::new(Mutex::new(session)),
            simulator,
            event_tx,
            accepting_new: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Subscribe to session events
    ///
    /// Each subscriber receives all events independently. A subscriber that
    /// falls more than 1000 events behind receives `RecvError::Lagged`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use smart_dl::{Config, SmartDownloader};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let downloader = SmartDownloader::new(Config::from_env())?;
    ///
    ///     let mut events = downloader.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             tracing::info!(?event, "session event");
    ///         }
    ///     });
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Consistent view of the whole session
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock_session().snapshot()
    }

    /// Current application status
    pub fn status(&self) -> AppStatus {
        self.lock_session().status
    }

    /// Current metadata and its source, if any
    pub fn metadata(&self) -> Option<Arc<StoredMetadata>> {
        self.lock_session().metadata.get()
    }

    /// Simulated download progress (0-100)
    pub fn progress(&self) -> u8 {
        self.lock_session().progress
    }

    /// True while a simulated download runs
    pub fn is_downloading(&self) -> bool {
        self.lock_session().is_downloading
    }

    /// History entries, newest first
    pub fn history(&self) -> Vec<HistoryItem> {
        self.lock_session().history.list()
    }

    /// Download options offered for an analyzed item
    pub fn catalog(&self) -> Vec<DownloadOption> {
        DownloadOption::catalog()
    }

    /// Name of the configured analysis client
    pub fn client_name(&self) -> &'static str {
        self.client.name()
    }

    pub(crate) fn lock_session(&self) -> MutexGuard<'_, SessionState> {
        lock_session(&self.session)
    }

    pub(crate) fn ensure_accepting(&self) -> Result<()> {
        if self.accepting_new.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::ShuttingDown)
        }
    }

    /// Emit an event to all subscribers
    ///
    /// Events sent with no active subscriber are dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Spawn the REST API server in a background task
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let downloader = self.clone();
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(downloader, config).await })
    }
}
