//! Master playlist line decoder

use std::sync::Arc;
use tracing::debug;

use super::{decode_custom, parse_field, parse_key};
use crate::error::Result;
use crate::playlist::attributes::AttributeList;
use crate::playlist::custom::{CustomTagDecoder, TagScope};
use crate::playlist::master::{Alternative, MasterPlaylist, VariantParams};
use crate::types::ListType;

/// Builds a [`MasterPlaylist`] from directive and URI lines
///
/// `#EXT-X-MEDIA` renditions accumulate until the next
/// `#EXT-X-STREAM-INF`, which takes them over; the variant itself is
/// completed by the following URI line. Renditions left over at the end
/// belong to the last variant.
pub struct MasterLineDecoder {
    playlist: MasterPlaylist,
    alternatives: Vec<Alternative>,
    pending_variant: Option<VariantParams>,
    strict: bool,
}

impl MasterLineDecoder {
    pub fn new(strict: bool) -> Self {
        Self {
            playlist: MasterPlaylist::new(),
            alternatives: Vec::new(),
            pending_variant: None,
            strict,
        }
    }

    pub fn decode_line(
        &mut self,
        line: &str,
        detected: &mut Option<ListType>,
        decoders: &[Arc<dyn CustomTagDecoder>],
    ) -> Result<()> {
        if !line.starts_with('#') {
            if let Some(params) = self.pending_variant.take() {
                self.playlist.append(line, params);
            }
            return Ok(());
        }

        if let Some(value) = line.strip_prefix("#EXT-X-STREAM-INF:") {
            *detected = Some(ListType::Master);
            let mut params = self.decode_variant(line, value)?;
            params.alternatives = std::mem::take(&mut self.alternatives);
            self.pending_variant = Some(params);
        } else if let Some(value) = line.strip_prefix("#EXT-X-I-FRAME-STREAM-INF:") {
            *detected = Some(ListType::Master);
            let mut params = self.decode_variant(line, value)?;
            params.iframe = true;
            let uri = AttributeList::parse(value)
                .get("URI")
                .unwrap_or_default()
                .to_string();
            self.playlist.append(uri, params);
        } else if let Some(value) = line.strip_prefix("#EXT-X-MEDIA:") {
            *detected = Some(ListType::Master);
            self.alternatives.push(decode_alternative(value));
        } else if let Some(value) = line.strip_prefix("#EXT-X-VERSION:") {
            let version = parse_field::<u8>(line, "version", value, self.strict)?;
            self.playlist.set_version(version);
        } else if line == "#EXT-X-INDEPENDENT-SEGMENTS" {
            self.playlist.set_independent_segments(true);
        } else if let Some(value) = line.strip_prefix("#EXT-X-SESSION-KEY:") {
            self.playlist.set_default_key(parse_key(value));
        } else if let Some((scope, tag)) = decode_custom(line, decoders, self.strict)? {
            if scope == TagScope::Playlist {
                self.playlist.set_custom_tag(tag);
            }
        }
        Ok(())
    }

    fn decode_variant(&self, line: &str, params: &str) -> Result<VariantParams> {
        let strict = self.strict;
        let mut variant = VariantParams::default();
        for (key, value) in AttributeList::parse(params).iter() {
            match key {
                "PROGRAM-ID" => variant.program_id = parse_field(line, "PROGRAM-ID", value, strict)?,
                "BANDWIDTH" => variant.bandwidth = parse_field(line, "BANDWIDTH", value, strict)?,
                "AVERAGE-BANDWIDTH" => {
                    variant.average_bandwidth =
                        parse_field(line, "AVERAGE-BANDWIDTH", value, strict)?
                }
                "FRAME-RATE" => variant.frame_rate = parse_field(line, "FRAME-RATE", value, strict)?,
                "CODECS" => variant.codecs = Some(value.to_string()),
                "RESOLUTION" => variant.resolution = Some(value.to_string()),
                "AUDIO" => variant.audio = Some(value.to_string()),
                "VIDEO" => variant.video = Some(value.to_string()),
                "SUBTITLES" => variant.subtitles = Some(value.to_string()),
                "CLOSED-CAPTIONS" => variant.closed_captions = Some(value.to_string()),
                "NAME" => variant.name = Some(value.to_string()),
                "VIDEO-RANGE" => variant.video_range = Some(value.to_string()),
                "HDCP-LEVEL" => variant.hdcp_level = Some(value.to_string()),
                _ => {}
            }
        }
        Ok(variant)
    }

    pub fn finish(mut self) -> MasterPlaylist {
        if self.pending_variant.is_some() {
            debug!("Dropping #EXT-X-STREAM-INF without URI");
        }
        if !self.alternatives.is_empty() {
            // trailing renditions go to the last variant
            if let Err(dropped) = self.playlist.attach_to_last(self.alternatives) {
                debug!(count = dropped.len(), "Dropping renditions without any variant");
            }
        }
        self.playlist
    }
}

fn decode_alternative(params: &str) -> Alternative {
    let mut alt = Alternative::default();
    for (key, value) in AttributeList::parse(params).iter() {
        match key {
            "TYPE" => alt.media_type = value.to_string(),
            "GROUP-ID" => alt.group_id = value.to_string(),
            "LANGUAGE" => alt.language = Some(value.to_string()),
            "NAME" => alt.name = value.to_string(),
            "DEFAULT" => alt.default = value == "YES",
            "AUTOSELECT" => alt.autoselect = value == "YES",
            "FORCED" => alt.forced = value == "YES",
            "INSTREAM-ID" => alt.instream_id = Some(value.to_string()),
            "CHARACTERISTICS" => alt.characteristics = Some(value.to_string()),
            "CHANNELS" => alt.channels = Some(value.to_string()),
            "URI" => alt.uri = Some(value.to_string()),
            _ => {}
        }
    }
    alt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaylistError;

    fn feed(decoder: &mut MasterLineDecoder, text: &str) -> Result<()> {
        let mut detected = None;
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            decoder.decode_line(line, &mut detected, &[])?;
        }
        Ok(())
    }

    #[test]
    fn test_alternatives_attach_to_next_variant() {
        let mut decoder = MasterLineDecoder::new(true);
        feed(
            &mut decoder,
            r#"#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",LANGUAGE="en",NAME="English",DEFAULT=YES,AUTOSELECT=YES,URI="en.m3u8"
#EXT-X-MEDIA:TYPE=SUBTITLES,GROUP-ID="subs",NAME="English",FORCED=NO,URI="subs.m3u8"
#EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=800000,CODECS="avc1.4d401e,mp4a.40.2",AUDIO="aac",SUBTITLES="subs"
low.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2400000,AUDIO="aac"
high.m3u8
"#,
        )
        .unwrap();
        let m = decoder.finish();
        let variants = m.variants();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].uri, "low.m3u8");
        assert_eq!(variants[0].params.program_id, 1);
        assert_eq!(
            variants[0].params.codecs.as_deref(),
            Some("avc1.4d401e,mp4a.40.2")
        );
        assert_eq!(variants[0].params.alternatives.len(), 2);
        assert!(variants[0].params.alternatives[0].default);
        assert!(variants[1].params.alternatives.is_empty());
        assert_eq!(m.version(), 4);
    }

    #[test]
    fn test_trailing_alternatives_go_to_last_variant() {
        let mut decoder = MasterLineDecoder::new(true);
        feed(
            &mut decoder,
            r#"#EXT-X-STREAM-INF:BANDWIDTH=800000
low.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2400000,AUDIO="aac"
high.m3u8
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",NAME="English",URI="en.m3u8"
"#,
        )
        .unwrap();
        let m = decoder.finish();
        let variants = m.variants();
        assert!(variants[0].params.alternatives.is_empty());
        assert_eq!(variants[1].params.alternatives.len(), 1);
        assert_eq!(variants[1].params.alternatives[0].group_id, "aac");

        let out = m.encode();
        let media = out.find("#EXT-X-MEDIA:").unwrap();
        assert!(media < out.find("high.m3u8").unwrap());
        assert!(media > out.find("low.m3u8").unwrap());
    }

    #[test]
    fn test_alternatives_without_variant_are_dropped() {
        let mut decoder = MasterLineDecoder::new(true);
        let mut detected = None;
        decoder
            .decode_line(
                r#"#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",NAME="English""#,
                &mut detected,
                &[],
            )
            .unwrap();
        assert_eq!(detected, Some(ListType::Master));
        assert!(decoder.finish().variants().is_empty());
    }

    #[test]
    fn test_iframe_variant_takes_inline_uri() {
        let mut decoder = MasterLineDecoder::new(true);
        feed(
            &mut decoder,
            r#"#EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=86000,URI="iframe.m3u8""#,
        )
        .unwrap();
        let m = decoder.finish();
        assert_eq!(m.variants()[0].uri, "iframe.m3u8");
        assert!(m.variants()[0].params.iframe);
    }

    #[test]
    fn test_bad_bandwidth() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=fast\nlow.m3u8\n";
        let mut strict = MasterLineDecoder::new(true);
        assert!(matches!(
            feed(&mut strict, text),
            Err(PlaylistError::Format { .. })
        ));

        let mut lenient = MasterLineDecoder::new(false);
        feed(&mut lenient, text).unwrap();
        assert_eq!(lenient.finish().variants()[0].params.bandwidth, 0);
    }

    #[test]
    fn test_session_key() {
        let mut decoder = MasterLineDecoder::new(true);
        feed(
            &mut decoder,
            "#EXT-X-SESSION-KEY:METHOD=SAMPLE-AES,URI=\"skd://k\",KEYFORMAT=\"com.apple\"\n",
        )
        .unwrap();
        let m = decoder.finish();
        assert_eq!(m.default_key().unwrap().method, "SAMPLE-AES");
        assert_eq!(m.version(), 5);
    }
}
