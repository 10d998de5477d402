//! Media playlist line decoder
//!
//! Segment tags precede the URI line they describe, so they are collected in
//! a pending accumulator and flushed onto the segment once its URI arrives.

use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{decode_custom, parse_field, parse_key, parse_map, parse_optional, parse_program_date_time};
use crate::config::DecodeConfig;
use crate::error::{PlaylistError, Result};
use crate::playlist::attributes::AttributeList;
use crate::playlist::custom::{CustomTag, CustomTagDecoder, CustomTags, TagScope};
use crate::playlist::media::MediaPlaylist;
use crate::playlist::segment::MediaSegment;
use crate::types::{ByteRange, CueType, Key, ListType, Map, PlaylistType, Scte, ScteSyntax, WidevineMetadata};

#[derive(Debug, Default)]
struct Pending {
    extinf: Option<(f64, String)>,
    byte_range: Option<ByteRange>,
    discontinuity: bool,
    program_date_time: Option<DateTime<FixedOffset>>,
    key: Option<Key>,
    map: Option<Map>,
    scte: Option<Scte>,
    custom_tags: CustomTags,
}

impl Pending {
    fn has_attributes(&self) -> bool {
        self.byte_range.is_some()
            || self.discontinuity
            || self.program_date_time.is_some()
            || self.key.is_some()
            || self.map.is_some()
            || self.scte.is_some()
            || !self.custom_tags.is_empty()
    }
}

/// Builds a [`MediaPlaylist`] from directive and URI lines
pub struct MediaLineDecoder {
    playlist: MediaPlaylist,
    pending: Pending,
    widevine: Option<WidevineMetadata>,
    strict: bool,
}

impl MediaLineDecoder {
    pub fn new(config: &DecodeConfig) -> Result<Self> {
        Ok(Self {
            playlist: MediaPlaylist::new(0, config.initial_capacity)?,
            pending: Pending::default(),
            widevine: None,
            strict: config.strict,
        })
    }

    pub fn decode_line(
        &mut self,
        line: &str,
        detected: &mut Option<ListType>,
        decoders: &[Arc<dyn CustomTagDecoder>],
    ) -> Result<()> {
        let strict = self.strict;

        if !line.starts_with('#') {
            return self.on_uri(line);
        }

        if let Some(value) = line.strip_prefix("#EXTINF:") {
            *detected = Some(ListType::Media);
            let (raw_duration, title) = match value.split_once(',') {
                Some((duration, title)) => (duration, title),
                None if strict => {
                    return Err(PlaylistError::format(line, "EXTINF", "missing comma"));
                }
                None => (value, ""),
            };
            let duration = parse_field::<f64>(line, "duration", raw_duration, strict)?;
            self.pending.extinf = Some((duration, title.to_string()));
        } else if let Some(value) = line.strip_prefix("#EXT-X-TARGETDURATION:") {
            *detected = Some(ListType::Media);
            let target = parse_field::<f64>(line, "target duration", value, strict)?;
            self.playlist.set_target_duration(target);
        } else if let Some(value) = line.strip_prefix("#EXT-X-MEDIA-SEQUENCE:") {
            *detected = Some(ListType::Media);
            let sequence = parse_field::<u64>(line, "media sequence", value, strict)?;
            self.playlist.set_media_sequence(sequence);
        } else if let Some(value) = line.strip_prefix("#EXT-X-VERSION:") {
            let version = parse_field::<u8>(line, "version", value, strict)?;
            self.playlist.set_version(version);
        } else if let Some(value) = line.strip_prefix("#EXT-X-PLAYLIST-TYPE:") {
            let playlist_type = parse_optional::<PlaylistType>(line, "playlist type", value, strict)?;
            self.playlist.set_playlist_type(playlist_type);
        } else if let Some(value) = line.strip_prefix("#EXT-X-DISCONTINUITY-SEQUENCE:") {
            let sequence = parse_field::<u64>(line, "discontinuity sequence", value, strict)?;
            self.playlist.set_discontinuity_sequence(sequence);
        } else if line == "#EXT-X-DISCONTINUITY" {
            self.pending.discontinuity = true;
        } else if let Some(value) = line.strip_prefix("#EXT-X-START:") {
            let attrs = AttributeList::parse(value);
            let offset = match attrs.get("TIME-OFFSET") {
                Some(raw) => parse_field::<f64>(line, "TIME-OFFSET", raw, strict)?,
                None => 0.0,
            };
            self.playlist
                .set_start_time(offset, attrs.get("PRECISE") == Some("YES"));
        } else if line == "#EXT-X-INDEPENDENT-SEGMENTS" {
            self.playlist.set_independent_segments(true);
        } else if line == "#EXT-X-I-FRAMES-ONLY" {
            self.playlist.set_i_frames_only();
        } else if line == "#EXT-X-ENDLIST" {
            self.playlist.close();
        } else if let Some(value) = line.strip_prefix("#EXT-X-KEY:") {
            let key = parse_key(value);
            if self.playlist.count() == 0 {
                self.playlist.set_default_key(key.clone());
            }
            self.pending.key = Some(key);
        } else if let Some(value) = line.strip_prefix("#EXT-X-MAP:") {
            let map = parse_map(line, value, strict)?;
            if self.playlist.count() == 0 {
                self.playlist.set_default_map(map.clone());
            }
            self.pending.map = Some(map);
        } else if let Some(value) = line.strip_prefix("#EXT-X-BYTERANGE:") {
            self.pending.byte_range = parse_optional::<ByteRange>(line, "byte range", value, strict)?;
        } else if let Some(value) = line.strip_prefix("#EXT-X-PROGRAM-DATE-TIME:") {
            match parse_program_date_time(value) {
                Ok(pdt) => self.pending.program_date_time = Some(pdt),
                Err(e) if strict => return Err(PlaylistError::format(line, "program date time", e)),
                Err(e) => warn!(line, error = %e, "Ignoring malformed program date time"),
            }
        } else if let Some(value) = line.strip_prefix("#EXT-SCTE35:") {
            self.decode_scte35(line, value)?;
        } else if let Some(value) = line.strip_prefix("#EXT-OATCLS-SCTE35:") {
            self.pending.scte = Some(Scte::oatcls(CueType::Start, value, 0.0, 0.0));
        } else if let Some(value) = line.strip_prefix("#EXT-X-CUE-OUT-CONT:") {
            self.decode_cue_out_cont(line, value)?;
        } else if line.starts_with("#EXT-X-CUE-OUT") {
            let time = match line.strip_prefix("#EXT-X-CUE-OUT:") {
                Some(value) => parse_field::<f64>(line, "cue out duration", value, strict)?,
                None => 0.0,
            };
            let scte = self
                .pending
                .scte
                .get_or_insert_with(|| Scte::oatcls(CueType::Start, "", 0.0, 0.0));
            scte.syntax = ScteSyntax::Oatcls;
            scte.cue_type = CueType::Start;
            scte.time = time;
        } else if line.starts_with("#EXT-X-CUE-IN") {
            self.pending.scte = Some(Scte::oatcls(CueType::End, "", 0.0, 0.0));
        } else if line.starts_with("#WV-") {
            self.decode_widevine(line)?;
        } else if let Some((scope, tag)) = decode_custom(line, decoders, strict)? {
            self.store_custom(scope, tag);
        }
        // anything else is a comment
        Ok(())
    }

    fn decode_scte35(&mut self, line: &str, params: &str) -> Result<()> {
        let attrs = AttributeList::parse(params);
        let mut scte = Scte::new(attrs.get("CUE").unwrap_or_default());
        scte.id = attrs.get("ID").map(str::to_string);
        if let Some(raw) = attrs.get("TIME") {
            scte.time = parse_field::<f64>(line, "SCTE35 TIME", raw, self.strict)?;
        }
        self.pending.scte = Some(scte);
        Ok(())
    }

    fn decode_cue_out_cont(&mut self, line: &str, params: &str) -> Result<()> {
        let attrs = AttributeList::parse(params);
        let elapsed = match attrs.get("ElapsedTime") {
            Some(raw) => parse_field::<f64>(line, "ElapsedTime", raw, self.strict)?,
            None => 0.0,
        };
        let time = match attrs.get("Duration") {
            Some(raw) => parse_field::<f64>(line, "Duration", raw, self.strict)?,
            None => 0.0,
        };
        let cue = attrs.get("SCTE35").unwrap_or_default();
        self.pending.scte = Some(Scte::oatcls(CueType::Mid, cue, time, elapsed));
        Ok(())
    }

    /// `#WV-<FIELD> <value>`
    fn decode_widevine(&mut self, line: &str) -> Result<()> {
        let strict = self.strict;
        let (tag, value) = line.split_once(' ').unwrap_or((line, ""));
        let value = value.trim();
        let wv = self.widevine.get_or_insert_with(WidevineMetadata::default);
        match tag {
            "#WV-AUDIO-CHANNELS" => wv.audio_channels = parse_field(line, tag_field(tag), value, strict)?,
            "#WV-AUDIO-FORMAT" => wv.audio_format = parse_field(line, tag_field(tag), value, strict)?,
            "#WV-AUDIO-PROFILE-IDC" => {
                wv.audio_profile_idc = parse_field(line, tag_field(tag), value, strict)?
            }
            "#WV-AUDIO-SAMPLE-SIZE" => {
                wv.audio_sample_size = parse_field(line, tag_field(tag), value, strict)?
            }
            "#WV-AUDIO-SAMPLING-FREQUENCY" => {
                wv.audio_sampling_frequency = parse_field(line, tag_field(tag), value, strict)?
            }
            "#WV-CYPHER-VERSION" => wv.cypher_version = value.to_string(),
            "#WV-ECM" => wv.ecm = value.to_string(),
            "#WV-VIDEO-FORMAT" => wv.video_format = parse_field(line, tag_field(tag), value, strict)?,
            "#WV-VIDEO-FRAME-RATE" => {
                wv.video_frame_rate = parse_field(line, tag_field(tag), value, strict)?
            }
            "#WV-VIDEO-LEVEL-IDC" => {
                wv.video_level_idc = parse_field(line, tag_field(tag), value, strict)?
            }
            "#WV-VIDEO-PROFILE-IDC" => {
                wv.video_profile_idc = parse_field(line, tag_field(tag), value, strict)?
            }
            "#WV-VIDEO-RESOLUTION" => wv.video_resolution = value.to_string(),
            "#WV-VIDEO-SAR" => wv.video_sar = value.to_string(),
            _ => debug!(line, "Unknown Widevine tag"),
        }
        Ok(())
    }

    fn store_custom(&mut self, scope: TagScope, tag: Arc<dyn CustomTag>) {
        match scope {
            TagScope::Playlist => self.playlist.set_custom_tag(tag),
            TagScope::Segment => {
                self.pending
                    .custom_tags
                    .insert(tag.tag_name().to_string(), tag);
            }
        }
    }

    fn on_uri(&mut self, uri: &str) -> Result<()> {
        if let Some((duration, title)) = self.pending.extinf.take() {
            self.append_growing(MediaSegment::new(uri, duration, title))?;
        }
        if !self.pending.has_attributes() {
            return Ok(());
        }
        if self.playlist.count() == 0 {
            if self.strict {
                return Err(PlaylistError::PlaylistEmpty);
            }
            debug!(uri, "Dropping segment tags without a segment");
            self.pending = Pending::default();
            return Ok(());
        }

        let pending = std::mem::take(&mut self.pending);
        if let Some(range) = pending.byte_range {
            self.playlist.set_range_on_last(range.limit, range.offset)?;
        }
        if let Some(scte) = pending.scte {
            self.playlist.set_scte_on_last(scte)?;
        }
        if pending.discontinuity {
            self.playlist.set_discontinuity_on_last()?;
        }
        if let Some(pdt) = pending.program_date_time {
            self.playlist.set_program_date_time_on_last(pdt)?;
        }
        if let Some(key) = pending.key {
            self.playlist.set_key_on_last(key)?;
        }
        if let Some(map) = pending.map {
            self.playlist.set_map_on_last(map)?;
        }
        for tag in pending.custom_tags.into_values() {
            self.playlist.set_custom_tag_on_last(tag)?;
        }
        Ok(())
    }

    /// Append, doubling the ring buffer whenever it is full.
    fn append_growing(&mut self, segment: MediaSegment) -> Result<()> {
        match self.playlist.append_segment(segment.clone()) {
            Err(PlaylistError::PlaylistFull) => {
                let capacity = self.playlist.capacity();
                self.playlist.grow_to((capacity * 2).max(1));
                self.playlist.append_segment(segment)
            }
            other => other,
        }
    }

    pub fn finish(mut self) -> MediaPlaylist {
        if self.pending.extinf.is_some() {
            debug!("Dropping trailing #EXTINF without URI");
        }
        if let Some(wv) = self.widevine.take() {
            self.playlist.set_widevine(wv);
        }
        self.playlist
    }
}

fn tag_field(tag: &str) -> &'static str {
    match tag {
        "#WV-AUDIO-CHANNELS" => "WV-AUDIO-CHANNELS",
        "#WV-AUDIO-FORMAT" => "WV-AUDIO-FORMAT",
        "#WV-AUDIO-PROFILE-IDC" => "WV-AUDIO-PROFILE-IDC",
        "#WV-AUDIO-SAMPLE-SIZE" => "WV-AUDIO-SAMPLE-SIZE",
        "#WV-AUDIO-SAMPLING-FREQUENCY" => "WV-AUDIO-SAMPLING-FREQUENCY",
        "#WV-VIDEO-FORMAT" => "WV-VIDEO-FORMAT",
        "#WV-VIDEO-FRAME-RATE" => "WV-VIDEO-FRAME-RATE",
        "#WV-VIDEO-LEVEL-IDC" => "WV-VIDEO-LEVEL-IDC",
        "#WV-VIDEO-PROFILE-IDC" => "WV-VIDEO-PROFILE-IDC",
        _ => "Widevine field",
    }
}
