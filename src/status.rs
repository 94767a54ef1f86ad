//! Application status machine.
//!
//! The status table is kept free of side effects so that it can be checked
//! on its own; [`SmartDownloader`](crate::SmartDownloader) applies the side
//! effects (clearing metadata, starting the simulator, appending history)
//! while holding its session lock.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overall application status. Exactly one value is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    /// Nothing analyzed yet
    #[default]
    Idle,
    /// Waiting for the analysis call to resolve
    Fetching,
    /// Metadata available, download options selectable
    Ready,
    /// A simulated download is running
    Downloading,
}

impl AppStatus {
    /// Lowercase name used in logs, errors and the wire format
    pub fn as_str(&self) -> &'static str {
        match self {
            AppStatus::Idle => "idle",
            AppStatus::Fetching => "fetching",
            AppStatus::Ready => "ready",
            AppStatus::Downloading => "downloading",
        }
    }

    /// Target status for `event`, or `None` when the event is not valid here.
    pub fn next(self, event: SessionEvent) -> Option<AppStatus> {
        use AppStatus::*;
        use SessionEvent::*;

        match (self, event) {
            (Idle | Ready, Submit) => Some(Fetching),
            (Fetching, AnalysisResolved) => Some(Ready),
            (Ready, SelectDownloadOption) => Some(Downloading),
            (Downloading, DownloadCompleted) => Some(Ready),
            (Downloading, DownloadCancelled) => Some(Ready),
            _ => None,
        }
    }

    /// True when `event` is accepted from this status.
    pub fn accepts(self, event: SessionEvent) -> bool {
        self.next(event).is_some()
    }
}

impl std::fmt::Display for AppStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that drive [`AppStatus`] transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// User submitted a URL
    Submit,
    /// Analysis finished (genuine or fallback result)
    AnalysisResolved,
    /// User picked a download option
    SelectDownloadOption,
    /// Simulated download reached completion
    DownloadCompleted,
    /// Simulated download was cancelled
    DownloadCancelled,
}

impl SessionEvent {
    /// Operation name used in [`Error::InvalidState`](crate::Error::InvalidState)
    pub fn operation(&self) -> &'static str {
        match self {
            SessionEvent::Submit => "submit",
            SessionEvent::AnalysisResolved => "resolve analysis",
            SessionEvent::SelectDownloadOption => "select download option",
            SessionEvent::DownloadCompleted => "complete download",
            SessionEvent::DownloadCancelled => "cancel download",
        }
    }
}
