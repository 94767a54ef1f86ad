//! Configuration types for smart-dl

use crate::error::{Error, Result};
use crate::types::VideoMetadata;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};
use utoipa::ToSchema;

/// Environment variables checked (in order) for the analysis API credential
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Main configuration for SmartDownloader
///
/// Fields are organized into logical sub-configs:
/// - [`analysis`](AnalysisConfig) - remote analysis endpoint and retry policy
/// - [`simulator`](SimulatorConfig) - progress cadence
/// - [`session`](SessionConfig) - display timing, history, derived fields
/// - [`fallback`](FallbackConfig) - record used when analysis fails
/// - [`server`](ServerIntegrationConfig) - REST API
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Remote analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Simulated download cadence
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Session behavior
    #[serde(default)]
    pub session: SessionConfig,

    /// Fixed record substituted when analysis fails
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// API server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Default configuration with the API credential taken from the environment.
    ///
    /// `GEMINI_API_KEY` wins over `API_KEY`; neither is required.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.analysis.api_key = api_key_from_env();
        config
    }

    /// Check values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<()> {
        if self.simulator.step == 0 || self.simulator.step > 100 {
            return Err(Error::Config {
                message: format!(
                    "simulator step must be between 1 and 100, got {}",
                    self.simulator.step
                ),
                key: Some("simulator.step".to_string()),
            });
        }
        if self.simulator.tick_interval.is_zero() {
            return Err(Error::Config {
                message: "simulator tick interval must be greater than zero".to_string(),
                key: Some("simulator.tick_interval".to_string()),
            });
        }
        if self.fallback.title.trim().is_empty() {
            return Err(Error::Config {
                message: "fallback title must not be empty".to_string(),
                key: Some("fallback.title".to_string()),
            });
        }
        if self.session.locale().is_none() {
            return Err(Error::Config {
                message: format!("unknown date locale '{}'", self.session.date_locale),
                key: Some("session.date_locale".to_string()),
            });
        }
        if url::Url::parse(&self.analysis.base_url).is_err() {
            return Err(Error::Config {
                message: format!("invalid analysis base URL '{}'", self.analysis.base_url),
                key: Some("analysis.base_url".to_string()),
            });
        }
        if self.analysis.retry.backoff_multiplier < 1.0 {
            return Err(Error::Config {
                message: "retry backoff multiplier must be at least 1.0".to_string(),
                key: Some("analysis.retry.backoff_multiplier".to_string()),
            });
        }
        Ok(())
    }
}

/// Read the analysis API credential from the process environment
pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Remote analysis configuration (generative-language API)
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalysisConfig {
    /// API base URL (default: "https://generativelanguage.googleapis.com/v1beta")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name (default: "gemini-3-flash-preview")
    #[serde(default = "default_model")]
    pub model: String,

    /// API credential. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds (default: 30000)
    #[serde(default = "default_request_timeout", with = "duration_millis")]
    #[schema(value_type = u64)]
    pub timeout: Duration,

    /// Language the model is asked to answer in (default: "Arabic")
    #[serde(default = "default_response_language")]
    pub response_language: String,

    /// Caller-side retry policy around each analysis call
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AnalysisConfig {
    /// The configured credential, ignoring blank values
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout: default_request_timeout(),
            response_language: default_response_language(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for analysis calls
///
/// `max_attempts` counts retries after the first call; the default of 0
/// performs exactly one call.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetryConfig {
    /// Maximum number of retries (default: 0)
    #[serde(default)]
    pub max_attempts: u32,

    /// Initial delay before the first retry in milliseconds (default: 500)
    #[serde(default = "default_initial_delay", with = "duration_millis")]
    #[schema(value_type = u64)]
    pub initial_delay: Duration,

    /// Maximum delay between retries in milliseconds (default: 8000)
    #[serde(default = "default_max_delay", with = "duration_millis")]
    #[schema(value_type = u64)]
    pub max_delay: Duration,

    /// Backoff multiplier (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Simulated download cadence
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SimulatorConfig {
    /// Time between progress ticks in milliseconds (default: 100)
    #[serde(default = "default_tick_interval", with = "duration_millis")]
    #[schema(value_type = u64)]
    pub tick_interval: Duration,

    /// Percent added per tick (default: 5)
    #[serde(default = "default_step")]
    pub step: u8,

    /// Pause at 100% before completion fires, in milliseconds (default: 500)
    #[serde(default = "default_settle_delay", with = "duration_millis")]
    #[schema(value_type = u64)]
    pub settle_delay: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: default_tick_interval(),
            step: default_step(),
            settle_delay: default_settle_delay(),
        }
    }
}

/// Session behavior and derived display fields
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionConfig {
    /// Minimum time `fetching` stays visible, in milliseconds (default: 1500)
    #[serde(default = "default_min_fetch_duration", with = "duration_millis")]
    #[schema(value_type = u64)]
    pub min_fetch_duration: Duration,

    /// Maximum history entries kept (None = unbounded, the default)
    #[serde(default)]
    pub history_limit: Option<usize>,

    /// chrono format string for history dates (default: "%-d %B %Y")
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Locale used for month and weekday names in history dates (default: "ar_EG")
    #[serde(default = "default_date_locale")]
    pub date_locale: String,

    /// History title used when no metadata is stored (default: "New download")
    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,

    /// Author attached to analyzed items (default: "Content Channel")
    #[serde(default = "default_author")]
    pub default_author: String,

    /// Duration attached to analyzed items (default: "12:45")
    #[serde(default = "default_duration")]
    pub default_duration: String,

    /// Thumbnail template; `{seed}` is replaced by a random number
    /// (default: "https://picsum.photos/seed/{seed}/800/450")
    #[serde(default = "default_thumbnail_template")]
    pub thumbnail_template: String,

    /// Text returned when recommendations are unavailable
    #[serde(default = "default_no_recommendations")]
    pub no_recommendations_text: String,
}

impl SessionConfig {
    /// Parsed [`date_locale`](Self::date_locale), `None` when chrono does not know it
    pub fn locale(&self) -> Option<chrono::Locale> {
        chrono::Locale::try_from(self.date_locale.as_str()).ok()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_fetch_duration: default_min_fetch_duration(),
            history_limit: None,
            date_format: default_date_format(),
            date_locale: default_date_locale(),
            placeholder_title: default_placeholder_title(),
            default_author: default_author(),
            default_duration: default_duration(),
            thumbnail_template: default_thumbnail_template(),
            no_recommendations_text: default_no_recommendations(),
        }
    }
}

/// Fixed record substituted when analysis fails
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FallbackConfig {
    /// Title (default: "Amazing video from the web")
    #[serde(default = "default_fallback_title")]
    pub title: String,
    /// Author (default: "CreatorX")
    #[serde(default = "default_fallback_author")]
    pub author: String,
    /// Duration (default: "05:20")
    #[serde(default = "default_fallback_duration")]
    pub duration: String,
    /// Thumbnail URL (default: "https://picsum.photos/800/450")
    #[serde(default = "default_fallback_thumbnail")]
    pub thumbnail: String,
    /// Summary points
    #[serde(default = "default_fallback_summary")]
    pub summary: Vec<String>,
    /// Category (default: "Technology")
    #[serde(default = "default_fallback_category")]
    pub category: String,
}

impl FallbackConfig {
    /// Build the fallback metadata record. Deterministic for a given config.
    pub fn to_metadata(&self) -> VideoMetadata {
        VideoMetadata {
            title: self.title.clone(),
            author: self.author.clone(),
            duration: self.duration.clone(),
            thumbnail: self.thumbnail.clone(),
            description: None,
            summary: Some(self.summary.clone()),
            category: Some(self.category.clone()),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            title: default_fallback_title(),
            author: default_fallback_author(),
            duration: default_fallback_duration(),
            thumbnail: default_fallback_thumbnail(),
            summary: default_fallback_summary(),
            category: default_fallback_category(),
        }
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:6790)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_response_language() -> String {
    "Arabic".to_string()
}

fn default_true() -> bool {
    true
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(8)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_tick_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_step() -> u8 {
    5
}

fn default_settle_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_min_fetch_duration() -> Duration {
    Duration::from_millis(1500)
}

fn default_date_format() -> String {
    "%-d %B %Y".to_string()
}

fn default_date_locale() -> String {
    "ar_EG".to_string()
}

fn default_placeholder_title() -> String {
    "New download".to_string()
}

fn default_author() -> String {
    "Content Channel".to_string()
}

fn default_duration() -> String {
    "12:45".to_string()
}

fn default_thumbnail_template() -> String {
    "https://picsum.photos/seed/{seed}/800/450".to_string()
}

fn default_no_recommendations() -> String {
    "No recommendations at the moment.".to_string()
}

fn default_fallback_title() -> String {
    "Amazing video from the web".to_string()
}

fn default_fallback_author() -> String {
    "CreatorX".to_string()
}

fn default_fallback_duration() -> String {
    "05:20".to_string()
}

fn default_fallback_thumbnail() -> String {
    "https://picsum.photos/800/450".to_string()
}

fn default_fallback_summary() -> Vec<String> {
    vec![
        "Overview of the technology".to_string(),
        "The future of artificial intelligence".to_string(),
        "Key takeaways".to_string(),
    ]
}

fn default_fallback_category() -> String {
    "Technology".to_string()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6790))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

// Durations are written as integer milliseconds
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
