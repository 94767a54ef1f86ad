//! Simulated download control (start/cancel) and simulator callbacks.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::simulator::SimulationObserver;
use crate::status::{AppStatus, SessionEvent};
use crate::types::{DownloadOption, Event};

use super::{SessionState, SmartDownloader, lock_session};

impl SmartDownloader {
    /// Start a simulated download for `option`
    ///
    /// Only valid in `ready`. Progress, completion and cancellation are
    /// reported through [`Event`]s; on completion one history entry is
    /// appended and the session returns to `ready`.
    pub fn select_download_option(&self, option: DownloadOption) -> Result<()> {
        let mut session = self.lock_session();
        // Shutdown flips the flag under this same lock.
        self.ensure_accepting()?;
        let current = session.status;
        if !current.accepts(SessionEvent::SelectDownloadOption) {
            return Err(Error::invalid_state(
                SessionEvent::SelectDownloadOption.operation(),
                current,
            ));
        }

        // No run can be active while `ready`, so no simulator callback is
        // waiting on the session lock here.
        let observer = Arc::new(SessionObserver {
            session: self.session.clone(),
            event_tx: self.event_tx.clone(),
            config: self.config.clone(),
        });
        let handle = self.simulator.start(option.clone(), observer)?;

        session.transition(SessionEvent::SelectDownloadOption, &self.event_tx)?;
        session.progress = 0;
        session.is_downloading = true;
        self.emit_event(Event::DownloadStarted {
            option: option.clone(),
        });
        drop(session);

        tracing::info!(
            run_id = handle.run_id(),
            quality = %option.quality,
            format = %option.format,
            "download started"
        );
        Ok(())
    }

    /// Cancel the running simulated download
    ///
    /// Progress resets to 0, no history entry is added and the session
    /// returns to `ready` before this method returns.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] unless a download is running.
    pub fn cancel_download(&self) -> Result<()> {
        {
            let session = self.lock_session();
            if !session.status.accepts(SessionEvent::DownloadCancelled) {
                return Err(Error::invalid_state(
                    SessionEvent::DownloadCancelled.operation(),
                    session.status,
                ));
            }
        }

        // The session lock must not be held here: the cancel callback takes it.
        if self.simulator.cancel() {
            tracing::info!("download cancelled");
            return Ok(());
        }

        // The run completed between the status check and the cancel
        Err(Error::invalid_state(
            SessionEvent::DownloadCancelled.operation(),
            self.status(),
        ))
    }
}

/// Mirrors simulator callbacks into the session
struct SessionObserver {
    session: Arc<Mutex<SessionState>>,
    event_tx: broadcast::Sender<Event>,
    config: Arc<Config>,
}

impl SimulationObserver for SessionObserver {
    fn on_progress(&self, percent: u8) {
        let mut session = lock_session(&self.session);
        if session.status != AppStatus::Downloading {
            return;
        }
        session.progress = percent;
        self.event_tx.send(Event::Progress { percent }).ok();
    }

    fn on_complete(&self, option: &DownloadOption) {
        let mut session = lock_session(&self.session);
        let settings = &self.config.session;

        let title = session
            .metadata
            .title()
            .unwrap_or(settings.placeholder_title.as_str())
            .to_string();
        let locale = settings.locale().unwrap_or(chrono::Locale::POSIX);
        let item = session.history.completed_item(
            &title,
            option,
            Utc::now(),
            &settings.date_format,
            locale,
        );

        if let Err(e) = session.transition(SessionEvent::DownloadCompleted, &self.event_tx) {
            tracing::warn!(error = %e, "ignoring completion outside a download");
            return;
        }
        session.history.append(item.clone());
        session.progress = 0;
        session.is_downloading = false;

        tracing::info!(history_id = %item.id, title = %item.title, "download complete");
        self.event_tx.send(Event::DownloadComplete { item }).ok();
    }

    fn on_cancel(&self, percent: u8) {
        let mut session = lock_session(&self.session);
        if let Err(e) = session.transition(SessionEvent::DownloadCancelled, &self.event_tx) {
            tracing::warn!(error = %e, "ignoring cancellation outside a download");
            return;
        }
        session.progress = 0;
        session.is_downloading = false;
        self.event_tx.send(Event::DownloadCancelled { percent }).ok();
    }
}
