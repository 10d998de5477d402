//! Media playlist
//!
//! A media playlist owns a fixed-capacity ring buffer of segments. Segments
//! are appended at `tail` and evicted from `head`; `window_size` bounds how
//! many of them, starting at `head`, one encode renders. A window size of 0
//! renders every segment, which is what closed (VOD) and event playlists
//! use.

use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::config::EncodeConfig;
use crate::error::{PlaylistError, Result};
use crate::playlist::custom::{CustomTag, CustomTags};
use crate::playlist::segment::MediaSegment;
use crate::playlist::version::{self, ratchet};
use crate::playlist::writer;
use crate::types::{ByteRange, Key, Map, PlaylistType, Scte, WidevineMetadata};

/// Sliding-window media playlist
#[derive(Debug, Clone)]
pub struct MediaPlaylist {
    segments: Vec<Option<MediaSegment>>,
    head: usize,
    tail: usize,
    count: usize,
    window_size: usize,
    next_sequence_id: u64,

    target_duration: f64,
    media_sequence: u64,
    discontinuity_sequence: u64,
    start_time: f64,
    start_time_precise: bool,
    playlist_type: Option<PlaylistType>,
    closed: bool,
    i_frames_only: bool,
    independent_segments: bool,

    default_key: Option<Key>,
    default_map: Option<Map>,
    widevine: Option<WidevineMetadata>,
    custom_tags: CustomTags,

    duration_as_int: bool,
    version: u8,
    rendered: OnceLock<String>,
}

impl MediaPlaylist {
    /// Create a playlist rendering `window_size` segments out of `capacity` slots.
    pub fn new(window_size: usize, capacity: usize) -> Result<Self> {
        if capacity < window_size {
            return Err(PlaylistError::InvalidCapacity {
                capacity,
                window_size,
            });
        }
        Ok(Self {
            segments: vec![None; capacity],
            head: 0,
            tail: 0,
            count: 0,
            window_size,
            next_sequence_id: 0,
            target_duration: 0.0,
            media_sequence: 0,
            discontinuity_sequence: 0,
            start_time: 0.0,
            start_time_precise: false,
            playlist_type: None,
            closed: false,
            i_frames_only: false,
            independent_segments: false,
            default_key: None,
            default_map: None,
            widevine: None,
            custom_tags: CustomTags::new(),
            duration_as_int: false,
            version: version::MIN_VERSION,
            rendered: OnceLock::new(),
        })
    }

    // ── Ring buffer ────────────────────────────────────────────────────────

    /// Append a new segment at the tail.
    pub fn append(
        &mut self,
        uri: impl Into<String>,
        duration: f64,
        title: impl Into<String>,
    ) -> Result<()> {
        self.append_segment(MediaSegment::new(uri, duration, title))
    }

    /// Append a fully built segment. Its `sequence_id` is overwritten with
    /// the next id of this playlist.
    pub fn append_segment(&mut self, mut segment: MediaSegment) -> Result<()> {
        if self.is_full() {
            return Err(PlaylistError::PlaylistFull);
        }
        segment.sequence_id = self.next_sequence_id;
        self.next_sequence_id += 1;

        if let Some(key) = &segment.key {
            ratchet(&mut self.version, version::key_version(key));
        }
        if segment.map.is_some() {
            ratchet(&mut self.version, version::VERSION_MAP);
        }
        if segment.byte_range.is_some() {
            ratchet(&mut self.version, version::VERSION_BYTE_RANGE);
        }

        let duration = segment.duration;
        let capacity = self.capacity();
        self.segments[self.tail] = Some(segment);
        self.tail = (self.tail + 1) % capacity;
        self.count += 1;
        if self.target_duration < duration.ceil() {
            self.target_duration = duration.ceil();
        }
        self.reset_cache();
        Ok(())
    }

    /// Evict the oldest segment.
    ///
    /// `media_sequence` only advances while the playlist is open.
    pub fn remove(&mut self) -> Result<()> {
        if self.count == 0 {
            return Err(PlaylistError::PlaylistEmpty);
        }
        self.segments[self.head] = None;
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;
        if !self.closed {
            self.media_sequence += 1;
        }
        self.reset_cache();
        Ok(())
    }

    /// Append and keep the live window at `window_size`.
    ///
    /// On an open playlist the oldest segment is evicted once the window is
    /// full; before that, `media_sequence` is bumped on every call instead.
    pub fn slide(
        &mut self,
        uri: impl Into<String>,
        duration: f64,
        title: impl Into<String>,
    ) -> Result<()> {
        if !self.closed {
            if self.count >= self.window_size {
                if self.count > 0 {
                    self.remove()?;
                }
            } else {
                self.media_sequence += 1;
            }
        }
        let result = self.append(uri, duration, title);
        self.reset_cache();
        result
    }

    /// Reallocate the backing store with `new_capacity` slots, laying the
    /// segments out from index 0 in logical order.
    ///
    /// Requests that do not enlarge the buffer are ignored.
    pub fn grow_to(&mut self, new_capacity: usize) {
        let capacity = self.capacity();
        if new_capacity <= capacity {
            return;
        }
        let mut segments: Vec<Option<MediaSegment>> = Vec::with_capacity(new_capacity);
        for i in 0..self.count {
            segments.push(self.segments[(self.head + i) % capacity].take());
        }
        segments.resize(new_capacity, None);

        tracing::debug!(
            old_capacity = capacity,
            new_capacity,
            count = self.count,
            "Grew media playlist ring buffer"
        );

        self.segments = segments;
        self.head = 0;
        self.tail = self.count % new_capacity;
    }

    fn is_full(&self) -> bool {
        self.capacity() == 0 || (self.head == self.tail && self.count > 0)
    }

    fn last_mut(&mut self) -> Result<&mut MediaSegment> {
        if self.count == 0 {
            return Err(PlaylistError::PlaylistEmpty);
        }
        let capacity = self.capacity();
        let last = (self.tail + capacity - 1) % capacity;
        self.segments[last]
            .as_mut()
            .ok_or(PlaylistError::PlaylistEmpty)
    }

    /// Most recently appended segment
    pub fn last(&self) -> Option<&MediaSegment> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.capacity();
        self.segments[(self.tail + capacity - 1) % capacity].as_ref()
    }

    pub fn set_key_on_last(&mut self, key: Key) -> Result<()> {
        let required = version::key_version(&key);
        self.last_mut()?.key = Some(key);
        ratchet(&mut self.version, required);
        self.reset_cache();
        Ok(())
    }

    pub fn set_map_on_last(&mut self, map: Map) -> Result<()> {
        self.last_mut()?.map = Some(map);
        ratchet(&mut self.version, version::VERSION_MAP);
        self.reset_cache();
        Ok(())
    }

    pub fn set_range_on_last(&mut self, limit: u64, offset: u64) -> Result<()> {
        self.last_mut()?.byte_range = Some(ByteRange::new(limit, offset));
        ratchet(&mut self.version, version::VERSION_BYTE_RANGE);
        self.reset_cache();
        Ok(())
    }

    pub fn set_discontinuity_on_last(&mut self) -> Result<()> {
        self.last_mut()?.discontinuity = true;
        self.reset_cache();
        Ok(())
    }

    pub fn set_program_date_time_on_last(&mut self, value: DateTime<FixedOffset>) -> Result<()> {
        self.last_mut()?.program_date_time = Some(value);
        self.reset_cache();
        Ok(())
    }

    pub fn set_scte_on_last(&mut self, scte: Scte) -> Result<()> {
        self.last_mut()?.scte = Some(scte);
        self.reset_cache();
        Ok(())
    }

    pub fn set_custom_tag_on_last(&mut self, tag: Arc<dyn CustomTag>) -> Result<()> {
        let name = tag.tag_name().to_string();
        self.last_mut()?.custom_tags.insert(name, tag);
        self.reset_cache();
        Ok(())
    }

    /// Every stored segment from head to tail, ignoring the window
    pub fn all_segments(&self) -> impl Iterator<Item = &MediaSegment> + '_ {
        let capacity = self.capacity();
        (0..self.count).filter_map(move |i| self.segments[(self.head + i) % capacity].as_ref())
    }

    /// Segments one encode renders
    pub fn window(&self) -> impl Iterator<Item = &MediaSegment> + '_ {
        let take = if self.window_size == 0 || self.closed {
            self.count
        } else {
            self.window_size.min(self.count)
        };
        self.all_segments().take(take)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.segments.len()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn set_window_size(&mut self, window_size: usize) -> Result<()> {
        if window_size > self.capacity() {
            return Err(PlaylistError::InvalidCapacity {
                capacity: self.capacity(),
                window_size,
            });
        }
        self.window_size = window_size;
        self.reset_cache();
        Ok(())
    }

    // ── Playlist-scoped attributes ─────────────────────────────────────────

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Raise the declared version. Lower values are ignored.
    pub fn set_version(&mut self, version: u8) {
        ratchet(&mut self.version, version);
        self.reset_cache();
    }

    pub fn target_duration(&self) -> f64 {
        self.target_duration
    }

    pub fn set_target_duration(&mut self, seconds: f64) {
        self.target_duration = seconds;
        self.reset_cache();
    }

    pub fn media_sequence(&self) -> u64 {
        self.media_sequence
    }

    pub fn set_media_sequence(&mut self, sequence: u64) {
        self.media_sequence = sequence;
        self.reset_cache();
    }

    pub fn discontinuity_sequence(&self) -> u64 {
        self.discontinuity_sequence
    }

    pub fn set_discontinuity_sequence(&mut self, sequence: u64) {
        self.discontinuity_sequence = sequence;
        self.reset_cache();
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn start_time_precise(&self) -> bool {
        self.start_time_precise
    }

    pub fn set_start_time(&mut self, offset: f64, precise: bool) {
        self.start_time = offset;
        self.start_time_precise = precise;
        self.reset_cache();
    }

    pub fn playlist_type(&self) -> Option<PlaylistType> {
        self.playlist_type
    }

    pub fn set_playlist_type(&mut self, playlist_type: Option<PlaylistType>) {
        self.playlist_type = playlist_type;
        self.reset_cache();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Mark the playlist as ended: `#EXT-X-ENDLIST` is written and every
    /// stored segment is rendered.
    pub fn close(&mut self) {
        self.closed = true;
        self.reset_cache();
    }

    pub fn i_frames_only(&self) -> bool {
        self.i_frames_only
    }

    pub fn set_i_frames_only(&mut self) {
        self.i_frames_only = true;
        ratchet(&mut self.version, version::VERSION_I_FRAMES);
        self.reset_cache();
    }

    pub fn independent_segments(&self) -> bool {
        self.independent_segments
    }

    pub fn set_independent_segments(&mut self, enabled: bool) {
        self.independent_segments = enabled;
        self.reset_cache();
    }

    pub fn default_key(&self) -> Option<&Key> {
        self.default_key.as_ref()
    }

    pub fn set_default_key(&mut self, key: Key) {
        ratchet(&mut self.version, version::key_version(&key));
        self.default_key = Some(key);
        self.reset_cache();
    }

    pub fn default_map(&self) -> Option<&Map> {
        self.default_map.as_ref()
    }

    pub fn set_default_map(&mut self, map: Map) {
        ratchet(&mut self.version, version::VERSION_MAP);
        self.default_map = Some(map);
        self.reset_cache();
    }

    pub fn widevine(&self) -> Option<&WidevineMetadata> {
        self.widevine.as_ref()
    }

    pub fn set_widevine(&mut self, metadata: WidevineMetadata) {
        self.widevine = Some(metadata);
        self.reset_cache();
    }

    pub fn custom_tags(&self) -> &CustomTags {
        &self.custom_tags
    }

    pub fn set_custom_tag(&mut self, tag: Arc<dyn CustomTag>) {
        self.custom_tags.insert(tag.tag_name().to_string(), tag);
        self.reset_cache();
    }

    // ── Encoding ───────────────────────────────────────────────────────────

    pub fn duration_as_int(&self) -> bool {
        self.duration_as_int
    }

    /// Render `#EXTINF` durations as rounded-up integers.
    pub fn set_duration_as_int(&mut self, enabled: bool) {
        self.duration_as_int = enabled;
        self.reset_cache();
    }

    pub fn apply_encode_config(&mut self, config: &EncodeConfig) {
        self.set_duration_as_int(config.duration_as_int);
    }

    /// Drop the rendered text so the next encode renders again.
    pub fn reset_cache(&mut self) {
        self.rendered.take();
    }

    /// Render the playlist. The text is cached until the next mutation.
    pub fn encode(&self) -> &str {
        self.rendered.get_or_init(|| writer::render_media(self))
    }
}

impl fmt::Display for MediaPlaylist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode())
    }
}
