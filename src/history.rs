//! In-memory ledger of finished simulated downloads.

use chrono::{DateTime, Locale, Utc};
use std::collections::VecDeque;

use crate::types::{DownloadOption, HistoryId, HistoryItem, HistoryStatus};

/// Append-only, newest-first record of completed downloads.
///
/// Lives for the process lifetime only. Unbounded unless a limit is given,
/// in which case the oldest entry is dropped once the limit is exceeded.
#[derive(Debug, Default)]
pub struct HistoryLedger {
    items: VecDeque<HistoryItem>,
    limit: Option<usize>,
    last_id: Option<HistoryId>,
}

impl HistoryLedger {
    /// Create an empty ledger. `limit` of `None` keeps everything.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            items: VecDeque::new(),
            limit: limit.filter(|l| *l > 0),
            last_id: None,
        }
    }

    /// Insert `item` at the head.
    pub fn append(&mut self, item: HistoryItem) {
        if self.last_id.is_none_or(|last| item.id > last) {
            self.last_id = Some(item.id);
        }
        self.items.push_front(item);

        if let Some(limit) = self.limit {
            while self.items.len() > limit {
                self.items.pop_back();
            }
        }
    }

    /// Copy of all entries, newest first
    pub fn list(&self) -> Vec<HistoryItem> {
        self.items.iter().cloned().collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no entry has been recorded
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Next identifier for an entry completed at `at`.
    ///
    /// Millisecond timestamp of `at`, bumped past the last issued id so ids
    /// stay unique and increasing even for completions in the same
    /// millisecond or after a clock step backwards.
    pub fn next_id(&self, at: DateTime<Utc>) -> HistoryId {
        let candidate = at.timestamp_millis();
        match self.last_id {
            Some(last) if candidate <= last.0 => HistoryId(last.0 + 1),
            _ => HistoryId(candidate),
        }
    }

    /// Build a `completed` entry for `option`, stamped at `at`.
    ///
    /// The display date is rendered with `date_format` in `locale`.
    pub fn completed_item(
        &self,
        title: &str,
        option: &DownloadOption,
        at: DateTime<Utc>,
        date_format: &str,
        locale: Locale,
    ) -> HistoryItem {
        HistoryItem {
            id: self.next_id(at),
            title: title.to_string(),
            date: format_date(at, date_format, locale),
            media_type: option.media_type,
            format: option.format,
            status: HistoryStatus::Completed,
            completed_at: at,
        }
    }
}

/// Local calendar date of `at`; an unusable format falls back to ISO 8601.
fn format_date(at: DateTime<Utc>, date_format: &str, locale: Locale) -> String {
    use std::fmt::Write;

    let local = at.with_timezone(&chrono::Local);
    let mut out = String::new();
    if write!(out, "{}", local.format_localized(date_format, locale)).is_err() {
        tracing::warn!(date_format, "invalid history date format, using ISO 8601");
        out = local.format("%Y-%m-%d").to_string();
    }
    out
}
