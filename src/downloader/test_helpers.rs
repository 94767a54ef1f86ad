//! Shared test helpers for creating SmartDownloader instances in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, broadcast};

use crate::analysis::{AnalysisClient, AnalysisResult};
use crate::config::{Config, RetryConfig, SessionConfig, SimulatorConfig};
use crate::downloader::SmartDownloader;
use crate::error::AnalysisError;
use crate::types::{DownloadOption, Event, MediaFormat, MediaType};

/// Analysis client with scripted answers
#[derive(Default)]
pub(crate) struct FakeClient {
    analyses: Mutex<VecDeque<Result<AnalysisResult, AnalysisError>>>,
    recommendation: Mutex<Option<Result<String, AnalysisError>>>,
    gate: Option<Arc<Notify>>,
    pub(crate) analyze_calls: AtomicUsize,
    pub(crate) recommend_calls: AtomicUsize,
}

impl FakeClient {
    /// Every analysis succeeds with [`sample_result`]
    pub(crate) fn succeeding() -> Self {
        Self::default()
    }

    /// Answers analyses in order, then falls back to [`sample_result`]
    pub(crate) fn scripted(results: Vec<Result<AnalysisResult, AnalysisError>>) -> Self {
        Self {
            analyses: Mutex::new(results.into()),
            ..Default::default()
        }
    }

    /// Every analysis fails with a server error
    pub(crate) fn failing() -> Self {
        Self::scripted(
            (0..16)
                .map(|_| {
                    Err(AnalysisError::HttpStatus {
                        status: 500,
                        body: "boom".to_string(),
                    })
                })
                .collect(),
        )
    }

    /// Analyses block until `gate` is notified
    pub(crate) fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub(crate) fn with_recommendation(self, answer: Result<String, AnalysisError>) -> Self {
        *self.recommendation.lock().unwrap() = Some(answer);
        self
    }
}

#[async_trait]
impl AnalysisClient for FakeClient {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn analyze(&self, _url: &str) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.analyses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(sample_result()))
    }

    async fn recommend(&self, _topic: &str) -> Result<String, AnalysisError> {
        self.recommend_calls.fetch_add(1, Ordering::SeqCst);
        self.recommendation
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(AnalysisError::EmptyResponse))
    }
}

/// The success payload used throughout the session scenarios
pub(crate) fn sample_result() -> AnalysisResult {
    AnalysisResult {
        title: "T".to_string(),
        summary: vec!["a".to_string(), "b".to_string()],
        description: "d".to_string(),
        category: "c".to_string(),
    }
}

/// Configuration with short timings so whole runs finish in milliseconds
pub(crate) fn fast_config() -> Config {
    Config {
        simulator: SimulatorConfig {
            tick_interval: Duration::from_millis(5),
            step: 25,
            settle_delay: Duration::from_millis(10),
        },
        session: SessionConfig {
            min_fetch_duration: Duration::ZERO,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Configuration whose simulated download takes long enough to interrupt
pub(crate) fn slow_download_config() -> Config {
    let mut config = fast_config();
    config.simulator = SimulatorConfig {
        tick_interval: Duration::from_millis(20),
        step: 1,
        settle_delay: Duration::from_millis(10),
    };
    config
}

pub(crate) fn create_test_downloader(client: FakeClient) -> SmartDownloader {
    create_test_downloader_with(fast_config(), Arc::new(client))
}

pub(crate) fn create_test_downloader_with(
    config: Config,
    client: Arc<FakeClient>,
) -> SmartDownloader {
    SmartDownloader::with_client(config, client).unwrap()
}

pub(crate) fn retrying(mut config: Config, max_attempts: u32) -> Config {
    config.analysis.retry = RetryConfig {
        max_attempts,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
        backoff_multiplier: 2.0,
        jitter: false,
    };
    config
}

pub(crate) fn audio_option() -> DownloadOption {
    DownloadOption::new("320kbps High", MediaFormat::Mp3, "12 MB", MediaType::Audio)
}

pub(crate) fn video_option() -> DownloadOption {
    DownloadOption::new("1080p Full HD", MediaFormat::Mp4, "124 MB", MediaType::Video)
}

/// Wait for the first event matching `predicate`, failing after five seconds
pub(crate) async fn wait_for_event<F>(rx: &mut broadcast::Receiver<Event>, predicate: F) -> Event
where
    F: Fn(&Event) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.unwrap();
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}
