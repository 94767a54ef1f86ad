//! Caller-side retry around analysis calls.
//!
//! Analysis clients never retry on their own; the controller wraps each call
//! with [`with_retry`]. The default [`RetryConfig`] makes exactly one attempt.

use crate::config::RetryConfig;
use crate::error::AnalysisError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Run `call`, retrying transient [`AnalysisError`]s up to
/// `config.max_attempts` extra times.
///
/// Permanent errors and the last transient error are returned as-is.
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, mut call: F) -> Result<T, AnalysisError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AnalysisError>>,
{
    let mut retries = 0;

    loop {
        let error = match call().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        if !error.is_transient() || retries >= config.max_attempts {
            return Err(error);
        }

        let delay = backoff_delay(config, retries);
        retries += 1;
        tracing::warn!(
            error = %error,
            retry = retries,
            max_attempts = config.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "analysis call failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Delay before the zero-based `retry`: exponential, capped at
/// `max_delay`, then stretched by up to 100% when jitter is on.
fn backoff_delay(config: &RetryConfig, retry: u32) -> Duration {
    let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
    let secs = config.initial_delay.as_secs_f64() * config.backoff_multiplier.powi(exponent);
    // f64::min discards NaN and infinity overflows to the cap
    let capped = Duration::from_secs_f64(secs.min(config.max_delay.as_secs_f64()));

    if config.jitter {
        capped.mul_f64(1.0 + rand::thread_rng().gen_range(0.0..=1.0))
    } else {
        capped
    }
}
