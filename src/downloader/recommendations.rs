//! Related-topic suggestions.

use crate::error::{Error, Result};
use crate::retry::with_retry;

use super::SmartDownloader;

impl SmartDownloader {
    /// Suggest topics related to `topic`
    ///
    /// Independent of the session status. Failures are logged and replaced
    /// with the configured "no recommendations" text.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for an empty topic, [`Error::ShuttingDown`]
    /// after shutdown.
    pub async fn recommend(&self, topic: &str) -> Result<String> {
        self.ensure_accepting()?;

        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::InvalidInput("topic must not be empty".to_string()));
        }

        match with_retry(&self.config.analysis.retry, || self.client.recommend(topic)).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(topic, error = %e, "recommendations unavailable");
                Ok(self.config.session.no_recommendations_text.clone())
            }
        }
    }
}
