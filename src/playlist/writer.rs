//! M3U8 text rendering
//!
//! Everything here writes into a `String` with `push_str`/`format!`, so
//! rendering cannot fail.

use chrono::SecondsFormat;

use crate::playlist::custom::write_custom_tags;
use crate::playlist::media::MediaPlaylist;
use crate::playlist::segment::MediaSegment;
use crate::types::{CueType, Key, Map, Scte, ScteSyntax, WidevineMetadata};

pub(crate) fn render_media(p: &MediaPlaylist) -> String {
    let mut out = String::with_capacity(1024);

    out.push_str("#EXTM3U\n");
    out.push_str(&format!("#EXT-X-VERSION:{}\n", p.version()));
    if p.independent_segments() {
        out.push_str("#EXT-X-INDEPENDENT-SEGMENTS\n");
    }
    write_custom_tags(&mut out, p.custom_tags());

    if let Some(key) = p.default_key() {
        write_key(&mut out, "#EXT-X-KEY:", key);
    }
    if let Some(map) = p.default_map() {
        write_map(&mut out, map);
    }
    if let Some(playlist_type) = p.playlist_type() {
        out.push_str(&format!("#EXT-X-PLAYLIST-TYPE:{}\n", playlist_type.as_str()));
    }
    out.push_str(&format!("#EXT-X-MEDIA-SEQUENCE:{}\n", p.media_sequence()));
    out.push_str(&format!(
        "#EXT-X-TARGETDURATION:{}\n",
        p.target_duration().ceil() as u64
    ));
    if p.start_time() > 0.0 {
        out.push_str(&format!("#EXT-X-START:TIME-OFFSET={}", p.start_time()));
        if p.start_time_precise() {
            out.push_str(",PRECISE=YES");
        }
        out.push('\n');
    }
    if p.discontinuity_sequence() != 0 {
        out.push_str(&format!(
            "#EXT-X-DISCONTINUITY-SEQUENCE:{}\n",
            p.discontinuity_sequence()
        ));
    }
    if p.i_frames_only() {
        out.push_str("#EXT-X-I-FRAMES-ONLY\n");
    }
    if let Some(wv) = p.widevine() {
        write_widevine(&mut out, wv);
    }

    let mut active_key = p.default_key();
    let mut active_map = p.default_map();
    for segment in p.window() {
        write_segment(
            &mut out,
            segment,
            &mut active_key,
            &mut active_map,
            p.duration_as_int(),
        );
    }

    if p.is_closed() {
        out.push_str("#EXT-X-ENDLIST\n");
    }
    out
}

fn write_segment<'a>(
    out: &mut String,
    segment: &'a MediaSegment,
    active_key: &mut Option<&'a Key>,
    active_map: &mut Option<&'a Map>,
    duration_as_int: bool,
) {
    if let Some(scte) = &segment.scte {
        write_scte(out, scte);
    }
    if let Some(key) = &segment.key {
        if *active_key != Some(key) {
            write_key(out, "#EXT-X-KEY:", key);
            *active_key = Some(key);
        }
    }
    if segment.discontinuity {
        out.push_str("#EXT-X-DISCONTINUITY\n");
    }
    if let Some(map) = &segment.map {
        if *active_map != Some(map) {
            write_map(out, map);
            *active_map = Some(map);
        }
    }
    if let Some(pdt) = &segment.program_date_time {
        out.push_str("#EXT-X-PROGRAM-DATE-TIME:");
        out.push_str(&pdt.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        out.push('\n');
    }
    if let Some(range) = &segment.byte_range {
        // always with the offset; a bare length continues the previous range
        out.push_str(&format!("#EXT-X-BYTERANGE:{}\n", range));
    }
    write_custom_tags(out, &segment.custom_tags);

    if duration_as_int {
        out.push_str(&format!(
            "#EXTINF:{},{}\n",
            segment.duration.ceil() as u64,
            segment.title
        ));
    } else {
        out.push_str(&format!("#EXTINF:{:.3},{}\n", segment.duration, segment.title));
    }
    out.push_str(&segment.uri);
    out.push('\n');
}

/// `tag` is `#EXT-X-KEY:` or `#EXT-X-SESSION-KEY:`
pub(crate) fn write_key(out: &mut String, tag: &str, key: &Key) {
    out.push_str(tag);
    out.push_str("METHOD=");
    out.push_str(&key.method);
    if !key.is_none_method() {
        if let Some(uri) = &key.uri {
            out.push_str(&format!(",URI=\"{}\"", uri));
        }
        if let Some(iv) = &key.iv {
            out.push_str(&format!(",IV={}", iv));
        }
        if let Some(keyformat) = &key.keyformat {
            out.push_str(&format!(",KEYFORMAT=\"{}\"", keyformat));
        }
        if let Some(versions) = &key.keyformatversions {
            out.push_str(&format!(",KEYFORMATVERSIONS=\"{}\"", versions));
        }
    }
    out.push('\n');
}

fn write_map(out: &mut String, map: &Map) {
    out.push_str(&format!("#EXT-X-MAP:URI=\"{}\"", map.uri));
    if let Some(range) = &map.byte_range {
        out.push_str(&format!(",BYTERANGE=\"{}\"", range));
    }
    out.push('\n');
}

fn write_scte(out: &mut String, scte: &Scte) {
    match scte.syntax {
        ScteSyntax::Scte35 => {
            out.push_str(&format!("#EXT-SCTE35:CUE=\"{}\"", scte.cue));
            if let Some(id) = &scte.id {
                out.push_str(&format!(",ID=\"{}\"", id));
            }
            if scte.time != 0.0 {
                out.push_str(&format!(",TIME={}", scte.time));
            }
            out.push('\n');
        }
        ScteSyntax::Oatcls => match scte.cue_type {
            CueType::Start => {
                out.push_str(&format!("#EXT-OATCLS-SCTE35:{}\n", scte.cue));
                out.push_str(&format!("#EXT-X-CUE-OUT:{}\n", scte.time));
            }
            CueType::Mid => {
                out.push_str(&format!(
                    "#EXT-X-CUE-OUT-CONT:ElapsedTime={},Duration={},SCTE35={}\n",
                    scte.elapsed, scte.time, scte.cue
                ));
            }
            CueType::End => out.push_str("#EXT-X-CUE-IN\n"),
        },
    }
}

fn write_widevine(out: &mut String, wv: &WidevineMetadata) {
    let numbers = [
        ("#WV-AUDIO-CHANNELS", wv.audio_channels),
        ("#WV-AUDIO-FORMAT", wv.audio_format),
        ("#WV-AUDIO-PROFILE-IDC", wv.audio_profile_idc),
        ("#WV-AUDIO-SAMPLE-SIZE", wv.audio_sample_size),
        ("#WV-AUDIO-SAMPLING-FREQUENCY", wv.audio_sampling_frequency),
    ];
    for (tag, value) in numbers {
        if value != 0 {
            out.push_str(&format!("{} {}\n", tag, value));
        }
    }
    if !wv.cypher_version.is_empty() {
        out.push_str(&format!("#WV-CYPHER-VERSION {}\n", wv.cypher_version));
    }
    if !wv.ecm.is_empty() {
        out.push_str(&format!("#WV-ECM {}\n", wv.ecm));
    }
    let video = [
        ("#WV-VIDEO-FORMAT", wv.video_format),
        ("#WV-VIDEO-FRAME-RATE", wv.video_frame_rate),
        ("#WV-VIDEO-LEVEL-IDC", wv.video_level_idc),
        ("#WV-VIDEO-PROFILE-IDC", wv.video_profile_idc),
    ];
    for (tag, value) in video {
        if value != 0 {
            out.push_str(&format!("{} {}\n", tag, value));
        }
    }
    if !wv.video_resolution.is_empty() {
        out.push_str(&format!("#WV-VIDEO-RESOLUTION {}\n", wv.video_resolution));
    }
    if !wv.video_sar.is_empty() {
        out.push_str(&format!("#WV-VIDEO-SAR {}\n", wv.video_sar));
    }
}
