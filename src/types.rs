//! Value records shared by media and master playlists.

use std::fmt;
use std::str::FromStr;

/// Kind of playlist a text blob turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Master,
    Media,
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListType::Master => f.write_str("master"),
            ListType::Media => f.write_str("media"),
        }
    }
}

/// `#EXT-X-PLAYLIST-TYPE` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistType {
    Event,
    Vod,
}

impl PlaylistType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistType::Event => "EVENT",
            PlaylistType::Vod => "VOD",
        }
    }
}

impl FromStr for PlaylistType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EVENT" => Ok(PlaylistType::Event),
            "VOD" => Ok(PlaylistType::Vod),
            other => Err(format!("unknown playlist type {:?}", other)),
        }
    }
}

/// Sub-range of a resource: `limit` bytes starting at `offset`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteRange {
    pub limit: u64,
    pub offset: u64,
}

impl ByteRange {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.limit, self.offset)
    }
}

impl FromStr for ByteRange {
    type Err = std::num::ParseIntError;

    /// Parses `<n>[@<o>]`; a missing offset is 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, '@');
        let limit = parts.next().unwrap_or_default().trim().parse()?;
        let offset = match parts.next() {
            Some(o) => o.trim().parse()?,
            None => 0,
        };
        Ok(Self { limit, offset })
    }
}

/// `#EXT-X-KEY` / `#EXT-X-SESSION-KEY` attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Key {
    pub method: String,
    pub uri: Option<String>,
    pub iv: Option<String>,
    pub keyformat: Option<String>,
    pub keyformatversions: Option<String>,
}

impl Key {
    /// Key with a method and URI and no optional attributes
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: Some(uri.into()),
            ..Default::default()
        }
    }

    pub fn with_iv(mut self, iv: impl Into<String>) -> Self {
        self.iv = Some(iv.into());
        self
    }

    pub fn with_keyformat(
        mut self,
        keyformat: impl Into<String>,
        keyformatversions: impl Into<String>,
    ) -> Self {
        self.keyformat = Some(keyformat.into());
        self.keyformatversions = Some(keyformatversions.into());
        self
    }

    /// `METHOD=NONE` carries no other attributes on output
    pub fn is_none_method(&self) -> bool {
        self.method == "NONE"
    }
}

/// `#EXT-X-MAP` attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Map {
    pub uri: String,
    pub byte_range: Option<ByteRange>,
}

impl Map {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            byte_range: None,
        }
    }

    pub fn with_range(mut self, limit: u64, offset: u64) -> Self {
        self.byte_range = Some(ByteRange::new(limit, offset));
        self
    }
}

/// Which tag family an ad cue was written with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScteSyntax {
    /// Single `#EXT-SCTE35:CUE=...,ID=...,TIME=...` attribute tag
    #[default]
    Scte35,
    /// `#EXT-OATCLS-SCTE35` / `#EXT-X-CUE-OUT` / `#EXT-X-CUE-OUT-CONT` / `#EXT-X-CUE-IN`
    Oatcls,
}

/// Position of a segment inside an ad break
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CueType {
    #[default]
    Start,
    Mid,
    End,
}

/// Ad-cue marker state attached to a segment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scte {
    pub syntax: ScteSyntax,
    pub cue_type: CueType,
    /// Base64 splice info
    pub cue: String,
    pub id: Option<String>,
    /// Total duration of the break in seconds
    pub time: f64,
    /// Seconds elapsed since the break started
    pub elapsed: f64,
}

impl Scte {
    /// `#EXT-SCTE35` cue
    pub fn new(cue: impl Into<String>) -> Self {
        Self {
            cue: cue.into(),
            ..Default::default()
        }
    }

    /// Cue in the OATCLS tag family
    pub fn oatcls(cue_type: CueType, cue: impl Into<String>, time: f64, elapsed: f64) -> Self {
        Self {
            syntax: ScteSyntax::Oatcls,
            cue_type,
            cue: cue.into(),
            id: None,
            time,
            elapsed,
        }
    }
}

/// Legacy `#WV-*` vendor metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidevineMetadata {
    pub audio_channels: u32,
    pub audio_format: u32,
    pub audio_profile_idc: u32,
    pub audio_sample_size: u32,
    pub audio_sampling_frequency: u32,
    pub cypher_version: String,
    pub ecm: String,
    pub video_format: u32,
    pub video_frame_rate: u32,
    pub video_level_idc: u32,
    pub video_profile_idc: u32,
    pub video_resolution: String,
    pub video_sar: String,
}
