//! Holder for the currently analyzed item.

use std::sync::Arc;

use crate::types::{MetadataSource, VideoMetadata};

/// A stored record and where it came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredMetadata {
    /// The record
    pub metadata: VideoMetadata,
    /// Genuine or fallback
    pub source: MetadataSource,
}

/// Holds at most one [`VideoMetadata`] at a time.
///
/// Records are immutable once stored and handed out as shared `Arc`s, so a
/// reader always sees either the previous record or the next one in full.
#[derive(Debug, Default)]
pub struct MetadataStore {
    current: Option<Arc<StoredMetadata>>,
}

impl MetadataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored record wholesale
    pub fn set(&mut self, metadata: VideoMetadata, source: MetadataSource) {
        self.current = Some(Arc::new(StoredMetadata { metadata, source }));
    }

    /// Current record, if any
    pub fn get(&self) -> Option<Arc<StoredMetadata>> {
        self.current.clone()
    }

    /// Title of the current record, if any
    pub fn title(&self) -> Option<&str> {
        self.current.as_deref().map(|s| s.metadata.title.as_str())
    }

    /// Drop the current record
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> VideoMetadata {
        VideoMetadata {
            title: title.to_string(),
            author: "author".to_string(),
            duration: "01:00".to_string(),
            thumbnail: "https://example.com/thumb.jpg".to_string(),
            description: None,
            summary: Some(vec!["a".to_string()]),
            category: None,
        }
    }

    #[test]
    fn starts_empty() {
        let store = MetadataStore::new();
        assert!(store.is_empty());
        assert!(store.get().is_none());
        assert!(store.title().is_none());
    }

    #[test]
    fn set_replaces_wholesale() {
        let mut store = MetadataStore::new();
        store.set(record("first"), MetadataSource::Analysis);
        let before = store.get();

        store.set(record("second"), MetadataSource::Fallback);

        // Earlier readers keep the record they were handed
        assert_eq!(before.map(|s| s.metadata.title.clone()).as_deref(), Some("first"));
        let now = store.get();
        assert_eq!(now.as_ref().map(|s| s.source), Some(MetadataSource::Fallback));
        assert_eq!(store.title(), Some("second"));
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = MetadataStore::new();
        store.set(record("t"), MetadataSource::Analysis);
        store.clear();
        assert!(store.is_empty());
    }
}
