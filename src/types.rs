//! Core types for smart-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::status::AppStatus;

/// Container format of a download option
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    /// MPEG-4 video
    Mp4,
    /// MP3 audio
    Mp3,
    /// Uncompressed WAV audio
    Wav,
}

impl MediaFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Mp3 => "mp3",
            MediaFormat::Wav => "wav",
        }
    }
}

impl std::fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Kind of media a download produces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Video with audio track
    Video,
    /// Audio only
    Audio,
}

/// A selectable download option. Sizes are display strings, not byte counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DownloadOption {
    /// Quality label (e.g., "1080p Full HD")
    pub quality: String,
    /// Container format
    pub format: MediaFormat,
    /// Display size (e.g., "124 MB")
    pub size: String,
    /// Video or audio
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

impl DownloadOption {
    /// Create a new download option
    pub fn new(
        quality: impl Into<String>,
        format: MediaFormat,
        size: impl Into<String>,
        media_type: MediaType,
    ) -> Self {
        Self {
            quality: quality.into(),
            format,
            size: size.into(),
            media_type,
        }
    }

    /// The fixed catalog offered for every analyzed item: two video, two audio.
    pub fn catalog() -> Vec<DownloadOption> {
        vec![
            Self::new("1080p Full HD", MediaFormat::Mp4, "124 MB", MediaType::Video),
            Self::new("720p HD", MediaFormat::Mp4, "78 MB", MediaType::Video),
            Self::new("320kbps High", MediaFormat::Mp3, "12 MB", MediaType::Audio),
            Self::new("Lossless WAV", MediaFormat::Wav, "45 MB", MediaType::Audio),
        ]
    }
}

/// Descriptive metadata for the analyzed item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VideoMetadata {
    /// Title (never empty)
    pub title: String,
    /// Author or channel name
    pub author: String,
    /// Free-form duration string (e.g., "12:45")
    pub duration: String,
    /// Thumbnail URL (may be synthetic)
    pub thumbnail: String,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Key points of the content, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<String>>,
    /// Category label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Where the stored metadata came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    /// Genuine result of the remote analysis
    Analysis,
    /// Fixed record substituted after an analysis failure
    Fallback,
}

/// Unique identifier for a history entry
///
/// Derived from the completion time in milliseconds; strictly increasing
/// within a ledger.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct HistoryId(pub i64);

impl HistoryId {
    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for HistoryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for HistoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome recorded in a history entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    /// Simulated download finished
    Completed,
    /// Reserved for a download that failed
    Failed,
    /// Reserved for a download still in progress
    Processing,
}

/// Record of a finished simulated download
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryItem {
    /// Unique identifier
    pub id: HistoryId,
    /// Title of the analyzed item at completion time
    pub title: String,
    /// Localized completion date
    pub date: String,
    /// Video or audio, copied from the selected option
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Container format of the selected option
    pub format: MediaFormat,
    /// Outcome
    pub status: HistoryStatus,
    /// Completion time
    #[schema(value_type = String)]
    pub completed_at: DateTime<Utc>,
}

/// Consistent read-only view of the session for a presentation layer
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionSnapshot {
    /// Current application status
    pub status: AppStatus,
    /// Current metadata, if any
    pub metadata: Option<VideoMetadata>,
    /// Whether `metadata` is a genuine or fallback result
    pub metadata_source: Option<MetadataSource>,
    /// Simulated download progress (0-100)
    pub progress: u8,
    /// True while a simulated download runs
    pub is_downloading: bool,
    /// History entries, newest first
    pub history: Vec<HistoryItem>,
}

/// Event emitted during the session lifecycle
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Application status changed
    StatusChanged {
        /// Previous status
        from: AppStatus,
        /// New status
        to: AppStatus,
    },

    /// Analysis started for a URL
    AnalysisStarted {
        /// Submitted URL (trimmed)
        url: String,
    },

    /// Analysis resolved and metadata was stored
    AnalysisComplete {
        /// Stored title
        title: String,
        /// Genuine or fallback
        source: MetadataSource,
    },

    /// Simulated download started
    DownloadStarted {
        /// Selected option
        option: DownloadOption,
    },

    /// Simulated download progress update
    Progress {
        /// Progress percentage (0-100)
        percent: u8,
    },

    /// Simulated download completed and was recorded
    DownloadComplete {
        /// The new history entry
        item: HistoryItem,
    },

    /// Simulated download was cancelled
    DownloadCancelled {
        /// Progress at the time of cancellation
        percent: u8,
    },

    /// Controller is shutting down
    Shutdown,
}

impl Event {
    /// Short snake_case name, used as the SSE event type
    pub fn kind(&self) -> &'static str {
        match self {
            Event::StatusChanged { .. } => "status_changed",
            Event::AnalysisStarted { .. } => "analysis_started",
            Event::AnalysisComplete { .. } => "analysis_complete",
            Event::DownloadStarted { .. } => "download_started",
            Event::Progress { .. } => "progress",
            Event::DownloadComplete { .. } => "download_complete",
            Event::DownloadCancelled { .. } => "download_cancelled",
            Event::Shutdown => "shutdown",
        }
    }
}
