//! Media segment record

use chrono::{DateTime, FixedOffset};
use std::sync::Arc;

use crate::playlist::custom::{CustomTag, CustomTags};
use crate::types::{ByteRange, Key, Map, Scte};

/// One entry of a media playlist's ring buffer
#[derive(Debug, Clone, Default)]
pub struct MediaSegment {
    /// Assigned by the playlist on append; never reused
    pub sequence_id: u64,
    pub uri: String,
    pub title: String,
    pub duration: f64,
    pub byte_range: Option<ByteRange>,
    /// `#EXT-X-DISCONTINUITY` precedes this segment
    pub discontinuity: bool,
    pub program_date_time: Option<DateTime<FixedOffset>>,
    /// Per-segment key override
    pub key: Option<Key>,
    /// Per-segment map override
    pub map: Option<Map>,
    pub scte: Option<Scte>,
    pub custom_tags: CustomTags,
}

impl MediaSegment {
    pub fn new(uri: impl Into<String>, duration: f64, title: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            duration,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn custom_tag(&self, name: &str) -> Option<&Arc<dyn CustomTag>> {
        self.custom_tags.get(name)
    }
}
