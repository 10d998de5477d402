//! Tag decode engine
//!
//! Text is consumed one line at a time. A [`Decoder`] either knows the
//! playlist kind up front or feeds every line to both line decoders until a
//! kind-specific tag settles the question:
//!
//! - `#EXT-X-STREAM-INF`, `#EXT-X-I-FRAME-STREAM-INF`, `#EXT-X-MEDIA` → master
//! - `#EXTINF`, `#EXT-X-TARGETDURATION`, `#EXT-X-MEDIA-SEQUENCE` → media

mod master;
mod media;

pub use master::MasterLineDecoder;
pub use media::MediaLineDecoder;

use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::config::DecodeConfig;
use crate::error::{PlaylistError, Result};
use crate::playlist::attributes::AttributeList;
use crate::playlist::custom::{CustomTag, CustomTagDecoder, TagScope};
use crate::playlist::master::MasterPlaylist;
use crate::playlist::media::MediaPlaylist;
use crate::types::{ByteRange, Key, ListType, Map};

/// Result of autodetecting decode
#[derive(Debug, Clone)]
pub enum Playlist {
    Master(MasterPlaylist),
    Media(MediaPlaylist),
}

impl Playlist {
    pub fn list_type(&self) -> ListType {
        match self {
            Playlist::Master(_) => ListType::Master,
            Playlist::Media(_) => ListType::Media,
        }
    }

    pub fn encode(&self) -> &str {
        match self {
            Playlist::Master(p) => p.encode(),
            Playlist::Media(p) => p.encode(),
        }
    }

    pub fn into_media(self) -> Option<MediaPlaylist> {
        match self {
            Playlist::Media(p) => Some(p),
            Playlist::Master(_) => None,
        }
    }

    pub fn into_master(self) -> Option<MasterPlaylist> {
        match self {
            Playlist::Master(p) => Some(p),
            Playlist::Media(_) => None,
        }
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode())
    }
}

/// Line-at-a-time playlist decoder
pub struct Decoder {
    strict: bool,
    decoders: Vec<Arc<dyn CustomTagDecoder>>,
    detected: Option<ListType>,
    seen_start_tag: bool,
    master: MasterLineDecoder,
    media: MediaLineDecoder,
}

impl Decoder {
    /// Decoder that autodetects the playlist kind.
    pub fn new(config: &DecodeConfig, decoders: &[Arc<dyn CustomTagDecoder>]) -> Result<Self> {
        Ok(Self {
            strict: config.strict,
            decoders: decoders.to_vec(),
            detected: None,
            seen_start_tag: false,
            master: MasterLineDecoder::new(config.strict),
            media: MediaLineDecoder::new(config)?,
        })
    }

    /// Decoder for a playlist whose kind is already known.
    pub fn with_type(
        list_type: ListType,
        config: &DecodeConfig,
        decoders: &[Arc<dyn CustomTagDecoder>],
    ) -> Result<Self> {
        let mut decoder = Self::new(config, decoders)?;
        decoder.detected = Some(list_type);
        Ok(decoder)
    }

    /// Kind of playlist seen so far
    pub fn detected(&self) -> Option<ListType> {
        self.detected
    }

    /// Consume one line of input.
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        if line.trim_end().is_empty() {
            return Ok(());
        }
        // titles and URIs keep their trailing whitespace
        let line = if line.starts_with('#') && !line.starts_with("#EXTINF:") {
            line.trim_end()
        } else {
            line
        };
        if line.starts_with("#EXTM3U") {
            self.seen_start_tag = true;
            return Ok(());
        }

        let result = self.dispatch(line);
        if let Err(e) = &result {
            debug!(error = %e, line, "Decoding aborted");
        }
        result
    }

    fn dispatch(&mut self, line: &str) -> Result<()> {
        match self.detected {
            Some(ListType::Master) => {
                self.master
                    .decode_line(line, &mut self.detected, &self.decoders)
            }
            Some(ListType::Media) => self.media.decode_line(line, &mut self.detected, &self.decoders),
            None => {
                self.master
                    .decode_line(line, &mut self.detected, &self.decoders)?;
                if self.detected == Some(ListType::Master) {
                    trace!("Detected master playlist");
                    return Ok(());
                }
                self.media
                    .decode_line(line, &mut self.detected, &self.decoders)?;
                if self.detected == Some(ListType::Media) {
                    trace!("Detected media playlist");
                }
                Ok(())
            }
        }
    }

    /// Finish decoding and hand out the playlist.
    pub fn finish(self) -> Result<Playlist> {
        if !self.seen_start_tag {
            if self.strict {
                return Err(PlaylistError::MissingStartTag);
            }
            warn!("Playlist does not start with #EXTM3U");
        }
        match self.detected {
            Some(ListType::Master) => Ok(Playlist::Master(self.master.finish())),
            Some(ListType::Media) => Ok(Playlist::Media(self.media.finish())),
            None => Err(PlaylistError::UnknownPlaylistType),
        }
    }
}

/// Decode a playlist of either kind from text.
pub fn decode(
    text: &str,
    config: &DecodeConfig,
    decoders: &[Arc<dyn CustomTagDecoder>],
) -> Result<Playlist> {
    let mut decoder = Decoder::new(config, decoders)?;
    for line in text.lines() {
        decoder.feed_line(line)?;
    }
    decoder.finish()
}

/// Decode a playlist of either kind from a line-oriented reader.
pub fn decode_reader<R: BufRead>(
    reader: R,
    config: &DecodeConfig,
    decoders: &[Arc<dyn CustomTagDecoder>],
) -> Result<Playlist> {
    let mut decoder = Decoder::new(config, decoders)?;
    for line in reader.lines() {
        decoder.feed_line(&line?)?;
    }
    decoder.finish()
}

fn decode_typed(
    text: &str,
    list_type: ListType,
    config: &DecodeConfig,
    decoders: &[Arc<dyn CustomTagDecoder>],
) -> Result<Playlist> {
    let mut decoder = Decoder::with_type(list_type, config, decoders)?;
    for line in text.lines() {
        decoder.feed_line(line)?;
    }
    decoder.finish()
}

fn typed_config(strict: bool) -> DecodeConfig {
    DecodeConfig {
        strict,
        ..Default::default()
    }
}

impl MediaPlaylist {
    /// Decode text known to be a media playlist.
    pub fn decode(text: &str, strict: bool) -> Result<Self> {
        Self::decode_with(text, &typed_config(strict), &[])
    }

    pub fn decode_with(
        text: &str,
        config: &DecodeConfig,
        decoders: &[Arc<dyn CustomTagDecoder>],
    ) -> Result<Self> {
        decode_typed(text, ListType::Media, config, decoders)?
            .into_media()
            .ok_or(PlaylistError::UnknownPlaylistType)
    }
}

impl MasterPlaylist {
    /// Decode text known to be a master playlist.
    pub fn decode(text: &str, strict: bool) -> Result<Self> {
        Self::decode_with(text, &typed_config(strict), &[])
    }

    pub fn decode_with(
        text: &str,
        config: &DecodeConfig,
        decoders: &[Arc<dyn CustomTagDecoder>],
    ) -> Result<Self> {
        decode_typed(text, ListType::Master, config, decoders)?
            .into_master()
            .ok_or(PlaylistError::UnknownPlaylistType)
    }
}

// ── Field helpers shared by both line decoders ─────────────────────────────

/// Parse a field; lenient mode logs and falls back to the zero value.
pub(crate) fn parse_field<T>(line: &str, field: &'static str, raw: &str, strict: bool) -> Result<T>
where
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    match raw.trim().parse::<T>() {
        Ok(value) => Ok(value),
        Err(e) if strict => Err(PlaylistError::format(line, field, e)),
        Err(e) => {
            warn!(field, line, error = %e, "Ignoring malformed field");
            Ok(T::default())
        }
    }
}

/// Like [`parse_field`] for values without a meaningful zero: lenient mode
/// yields `None`.
pub(crate) fn parse_optional<T>(
    line: &str,
    field: &'static str,
    raw: &str,
    strict: bool,
) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw.trim().parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(e) if strict => Err(PlaylistError::format(line, field, e)),
        Err(e) => {
            warn!(field, line, error = %e, "Ignoring malformed field");
            Ok(None)
        }
    }
}

pub(crate) fn parse_program_date_time(
    value: &str,
) -> std::result::Result<DateTime<FixedOffset>, chrono::ParseError> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
}

/// Attributes of `#EXT-X-KEY` / `#EXT-X-SESSION-KEY`
pub(crate) fn parse_key(params: &str) -> Key {
    let attrs = AttributeList::parse(params);
    let owned = |name: &str| attrs.get(name).map(str::to_string);
    Key {
        method: attrs.get("METHOD").unwrap_or_default().to_string(),
        uri: owned("URI"),
        iv: owned("IV"),
        keyformat: owned("KEYFORMAT"),
        keyformatversions: owned("KEYFORMATVERSIONS"),
    }
}

pub(crate) fn parse_map(line: &str, params: &str, strict: bool) -> Result<Map> {
    let attrs = AttributeList::parse(params);
    let mut map = Map::new(attrs.get("URI").unwrap_or_default());
    if let Some(range) = attrs.get("BYTERANGE") {
        map.byte_range = parse_optional::<ByteRange>(line, "BYTERANGE", range, strict)?;
    }
    Ok(map)
}

/// Offer an unrecognised directive to the custom decoders.
///
/// `Ok(None)` when no decoder claims the line, or when a lenient decode
/// drops a failing tag.
pub(crate) fn decode_custom(
    line: &str,
    decoders: &[Arc<dyn CustomTagDecoder>],
    strict: bool,
) -> Result<Option<(TagScope, Arc<dyn CustomTag>)>> {
    for decoder in decoders {
        match decoder.try_decode(line) {
            None => continue,
            Some(Ok(tag)) => return Ok(Some((decoder.scope(), tag))),
            Some(Err(source)) if strict => {
                return Err(PlaylistError::CustomTagDecode {
                    tag: decoder.tag_name().to_string(),
                    source,
                })
            }
            Some(Err(e)) => {
                warn!(tag = decoder.tag_name(), error = %e, "Dropping custom tag");
                return Ok(None);
            }
        }
    }
    Ok(None)
}
