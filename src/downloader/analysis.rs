//! URL submission and analysis resolution.

use crate::analysis::AnalysisResult;
use crate::error::{AnalysisError, Error, Result};
use crate::metadata::StoredMetadata;
use crate::retry::with_retry;
use crate::status::SessionEvent;
use crate::types::{Event, MetadataSource};

use super::SmartDownloader;

impl SmartDownloader {
    /// Submit a URL for analysis
    ///
    /// Moves the session from `idle` or `ready` to `fetching`, clearing any
    /// previous metadata before the remote call starts. The call is retried
    /// per `analysis.retry`; if it still fails the configured fallback record
    /// is stored instead, so the session always ends in `ready`.
    ///
    /// The analysis runs on its own task: dropping the returned future does
    /// not leave the session stuck in `fetching`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] when `url` is empty or whitespace (no state change)
    /// - [`Error::InvalidState`] while `fetching` or `downloading`
    /// - [`Error::ShuttingDown`] after [`shutdown`](Self::shutdown)
    pub async fn submit(&self, url: &str) -> Result<StoredMetadata> {
        self.ensure_accepting()?;

        let url = url.trim();
        if url.is_empty() {
            return Err(Error::InvalidUrl("URL must not be empty".to_string()));
        }

        let started = tokio::time::Instant::now();
        {
            let mut session = self.lock_session();
            session.transition(SessionEvent::Submit, &self.event_tx)?;
            session.metadata.clear();
            self.emit_event(Event::AnalysisStarted {
                url: url.to_string(),
            });
        }
        tracing::info!(url, client = self.client.name(), "analysis started");

        let this = self.clone();
        let url = url.to_string();
        let task = tokio::spawn(async move { this.resolve_analysis(&url, started).await });

        task.await
            .map_err(|e| Error::Other(format!("analysis task failed: {}", e)))?
    }

    async fn resolve_analysis(
        &self,
        url: &str,
        started: tokio::time::Instant,
    ) -> Result<StoredMetadata> {
        let outcome: std::result::Result<AnalysisResult, AnalysisError> =
            with_retry(&self.config.analysis.retry, || self.client.analyze(url)).await;

        let (metadata, source) = match outcome {
            Ok(result) => (
                result.into_metadata(&self.config.session),
                MetadataSource::Analysis,
            ),
            Err(e) => {
                tracing::warn!(
                    url,
                    client = self.client.name(),
                    error = %e,
                    "analysis failed, using fallback record"
                );
                (self.config.fallback.to_metadata(), MetadataSource::Fallback)
            }
        };

        // Keep `fetching` visible for at least the configured time
        tokio::time::sleep_until(started + self.config.session.min_fetch_duration).await;

        let mut session = self.lock_session();
        session.transition(SessionEvent::AnalysisResolved, &self.event_tx)?;
        session.metadata.set(metadata.clone(), source);
        self.emit_event(Event::AnalysisComplete {
            title: metadata.title.clone(),
            source,
        });
        drop(session);

        tracing::info!(url, title = %metadata.title, ?source, "analysis resolved");
        Ok(StoredMetadata { metadata, source })
    }
}
