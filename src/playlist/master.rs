//! Master playlist
//!
//! Lists the variant streams of a presentation and the alternative
//! renditions (audio, subtitles, captions) grouped with them.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::playlist::custom::{write_custom_tags, CustomTag, CustomTags};
use crate::playlist::version::{self, ratchet};
use crate::playlist::writer::write_key;
use crate::types::Key;

/// `#EXT-X-MEDIA` rendition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alternative {
    /// `AUDIO`, `VIDEO`, `SUBTITLES` or `CLOSED-CAPTIONS`
    pub media_type: String,
    pub group_id: String,
    pub uri: Option<String>,
    pub language: Option<String>,
    pub name: String,
    pub default: bool,
    pub autoselect: bool,
    pub forced: bool,
    pub instream_id: Option<String>,
    pub characteristics: Option<String>,
    pub channels: Option<String>,
}

impl Alternative {
    pub fn new(
        media_type: impl Into<String>,
        group_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            media_type: media_type.into(),
            group_id: group_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Identity used to write each rendition once per master playlist
    fn identity(&self) -> (&str, &str, &str, Option<&str>) {
        (
            &self.media_type,
            &self.group_id,
            &self.name,
            self.language.as_deref(),
        )
    }
}

/// Attributes of `#EXT-X-STREAM-INF` / `#EXT-X-I-FRAME-STREAM-INF`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantParams {
    /// Written only when non-zero
    pub program_id: u32,
    pub bandwidth: u64,
    pub average_bandwidth: u64,
    pub codecs: Option<String>,
    pub resolution: Option<String>,
    pub audio: Option<String>,
    pub video: Option<String>,
    pub subtitles: Option<String>,
    /// `NONE` is written unquoted
    pub closed_captions: Option<String>,
    pub name: Option<String>,
    pub frame_rate: f64,
    pub video_range: Option<String>,
    pub hdcp_level: Option<String>,
    /// I-frame-only stream, rendered as `#EXT-X-I-FRAME-STREAM-INF`
    pub iframe: bool,
    pub alternatives: Vec<Alternative>,
}

impl VariantParams {
    fn required_version(&self) -> u8 {
        let mut required = 0;
        if !self.alternatives.is_empty() {
            ratchet(&mut required, version::VERSION_ALTERNATIVES);
        }
        if self.iframe {
            ratchet(&mut required, version::VERSION_I_FRAMES);
        }
        if self.audio.is_some() || self.video.is_some() {
            ratchet(&mut required, version::VERSION_GROUP_REFERENCE);
        }
        if self.video_range.is_some() || self.hdcp_level.is_some() {
            ratchet(&mut required, version::VERSION_VIDEO_RANGE);
        }
        required
    }
}

/// One variant stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variant {
    pub uri: String,
    pub params: VariantParams,
}

/// Master playlist
#[derive(Debug, Clone)]
pub struct MasterPlaylist {
    variants: Vec<Variant>,
    default_key: Option<Key>,
    independent_segments: bool,
    custom_tags: CustomTags,
    version: u8,
    rendered: OnceLock<String>,
}

impl Default for MasterPlaylist {
    fn default() -> Self {
        Self::new()
    }
}

impl MasterPlaylist {
    pub fn new() -> Self {
        Self {
            variants: Vec::new(),
            default_key: None,
            independent_segments: false,
            custom_tags: CustomTags::new(),
            version: version::MIN_VERSION,
            rendered: OnceLock::new(),
        }
    }

    /// Add a variant, raising the version to what its attributes need.
    pub fn append(&mut self, uri: impl Into<String>, params: VariantParams) {
        ratchet(&mut self.version, params.required_version());
        self.variants.push(Variant {
            uri: uri.into(),
            params,
        });
        self.reset_cache();
    }

    /// Hand renditions to the most recent variant. Returns them back when
    /// there is no variant yet.
    pub(crate) fn attach_to_last(
        &mut self,
        alternatives: Vec<Alternative>,
    ) -> std::result::Result<(), Vec<Alternative>> {
        let Some(last) = self.variants.last_mut() else {
            return Err(alternatives);
        };
        last.params.alternatives.extend(alternatives);
        ratchet(&mut self.version, last.params.required_version());
        self.reset_cache();
        Ok(())
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Raise the declared version. Lower values are ignored.
    pub fn set_version(&mut self, version: u8) {
        ratchet(&mut self.version, version);
        self.reset_cache();
    }

    /// Session key, written as `#EXT-X-SESSION-KEY`
    pub fn default_key(&self) -> Option<&Key> {
        self.default_key.as_ref()
    }

    pub fn set_default_key(&mut self, key: Key) {
        ratchet(&mut self.version, version::key_version(&key));
        self.default_key = Some(key);
        self.reset_cache();
    }

    pub fn independent_segments(&self) -> bool {
        self.independent_segments
    }

    pub fn set_independent_segments(&mut self, enabled: bool) {
        self.independent_segments = enabled;
        self.reset_cache();
    }

    pub fn custom_tags(&self) -> &CustomTags {
        &self.custom_tags
    }

    pub fn set_custom_tag(&mut self, tag: Arc<dyn CustomTag>) {
        self.custom_tags.insert(tag.tag_name().to_string(), tag);
        self.reset_cache();
    }

    pub fn reset_cache(&mut self) {
        self.rendered.take();
    }

    /// Render the playlist. The text is cached until the next mutation.
    pub fn encode(&self) -> &str {
        self.rendered.get_or_init(|| self.render())
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(1024);

        out.push_str("#EXTM3U\n");
        out.push_str(&format!("#EXT-X-VERSION:{}\n", self.version));
        if self.independent_segments {
            out.push_str("#EXT-X-INDEPENDENT-SEGMENTS\n");
        }
        if let Some(key) = &self.default_key {
            write_key(&mut out, "#EXT-X-SESSION-KEY:", key);
        }
        write_custom_tags(&mut out, &self.custom_tags);

        let mut written = HashSet::new();
        for variant in &self.variants {
            for alt in &variant.params.alternatives {
                if written.insert(alt.identity()) {
                    write_alternative(&mut out, alt);
                }
            }
            write_variant(&mut out, variant);
        }
        out
    }
}

impl fmt::Display for MasterPlaylist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

fn write_alternative(out: &mut String, alt: &Alternative) {
    out.push_str(&format!("#EXT-X-MEDIA:TYPE={}", alt.media_type));
    out.push_str(&format!(",GROUP-ID=\"{}\"", alt.group_id));
    if let Some(language) = &alt.language {
        out.push_str(&format!(",LANGUAGE=\"{}\"", language));
    }
    out.push_str(&format!(",NAME=\"{}\"", alt.name));
    out.push_str(&format!(",DEFAULT={}", yes_no(alt.default)));
    out.push_str(&format!(",AUTOSELECT={}", yes_no(alt.autoselect)));
    if alt.forced {
        out.push_str(",FORCED=YES");
    }
    if let Some(instream_id) = &alt.instream_id {
        out.push_str(&format!(",INSTREAM-ID=\"{}\"", instream_id));
    }
    if let Some(characteristics) = &alt.characteristics {
        out.push_str(&format!(",CHARACTERISTICS=\"{}\"", characteristics));
    }
    if let Some(channels) = &alt.channels {
        out.push_str(&format!(",CHANNELS=\"{}\"", channels));
    }
    if let Some(uri) = &alt.uri {
        out.push_str(&format!(",URI=\"{}\"", uri));
    }
    out.push('\n');
}

fn write_variant(out: &mut String, variant: &Variant) {
    let p = &variant.params;
    let mut attrs: Vec<String> = Vec::new();

    if p.program_id != 0 {
        attrs.push(format!("PROGRAM-ID={}", p.program_id));
    }
    attrs.push(format!("BANDWIDTH={}", p.bandwidth));
    if p.average_bandwidth != 0 {
        attrs.push(format!("AVERAGE-BANDWIDTH={}", p.average_bandwidth));
    }
    if let Some(codecs) = &p.codecs {
        attrs.push(format!("CODECS=\"{}\"", codecs));
    }
    if let Some(resolution) = &p.resolution {
        attrs.push(format!("RESOLUTION={}", resolution));
    }
    if let Some(audio) = &p.audio {
        attrs.push(format!("AUDIO=\"{}\"", audio));
    }
    if let Some(video) = &p.video {
        attrs.push(format!("VIDEO=\"{}\"", video));
    }
    if !p.iframe {
        if let Some(cc) = &p.closed_captions {
            if cc == "NONE" {
                attrs.push("CLOSED-CAPTIONS=NONE".to_string());
            } else {
                attrs.push(format!("CLOSED-CAPTIONS=\"{}\"", cc));
            }
        }
    }
    if let Some(name) = &p.name {
        attrs.push(format!("NAME=\"{}\"", name));
    }
    if !p.iframe {
        if let Some(subtitles) = &p.subtitles {
            attrs.push(format!("SUBTITLES=\"{}\"", subtitles));
        }
        if p.frame_rate > 0.0 {
            attrs.push(format!("FRAME-RATE={:.3}", p.frame_rate));
        }
    }
    if let Some(range) = &p.video_range {
        attrs.push(format!("VIDEO-RANGE={}", range));
    }
    if let Some(hdcp) = &p.hdcp_level {
        attrs.push(format!("HDCP-LEVEL={}", hdcp));
    }

    if p.iframe {
        attrs.push(format!("URI=\"{}\"", variant.uri));
        out.push_str("#EXT-X-I-FRAME-STREAM-INF:");
        out.push_str(&attrs.join(","));
        out.push('\n');
    } else {
        out.push_str("#EXT-X-STREAM-INF:");
        out.push_str(&attrs.join(","));
        out.push('\n');
        out.push_str(&variant.uri);
        out.push('\n');
    }
}
