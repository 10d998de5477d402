//! Sample playlists for end-to-end tests
//!
//! Every fixture except [`MALFORMED_MEDIA`] is written exactly the way the
//! encoder renders it, so decoding and re-encoding reproduces the text.

/// Closed VOD playlist
pub const MEDIA_VOD: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-PLAYLIST-TYPE:VOD
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-TARGETDURATION:10
#EXTINF:9.009,
segment0.ts
#EXTINF:9.009,
segment1.ts
#EXTINF:3.003,
segment2.ts
#EXT-X-ENDLIST
";

/// Three sub-ranges of one resource
pub const MEDIA_BYTERANGE: &str = "#EXTM3U
#EXT-X-VERSION:4
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-TARGETDURATION:10
#EXT-X-BYTERANGE:75232@0
#EXTINF:10.000,
video.ts
#EXT-X-BYTERANGE:82112@752321
#EXTINF:10.000,
video.ts
#EXT-X-BYTERANGE:69864@834433
#EXTINF:10.000,
video.ts
";

/// SCTE-35 cue on the third segment only
pub const MEDIA_SCTE35: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-TARGETDURATION:10
#EXTINF:10.000,
media0.ts
#EXTINF:10.000,
media1.ts
#EXT-SCTE35:CUE=\"/DAIAAAAAAAAAAAQAAZ/I0VniQAQAgBDVUVJQAAAAH+cAAAAAA==\",ID=\"123\",TIME=123.12
#EXTINF:10.000,
media2.ts
";

/// Ad break in the OATCLS tag family
pub const MEDIA_OATCLS: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-TARGETDURATION:10
#EXTINF:10.000,
pre.ts
#EXT-OATCLS-SCTE35:/DAlAAAAAAAAAP/wFAUAAAABf+/+ANgNkv4AFJlwAAEBAQAA5xULLA==
#EXT-X-CUE-OUT:15
#EXTINF:5.000,
ad0.ts
#EXT-X-CUE-OUT-CONT:ElapsedTime=5,Duration=15,SCTE35=/DAlAAAAAAAAAP/wFAUAAAABf+/+ANgNkv4AFJlwAAEBAQAA5xULLA==
#EXTINF:10.000,
ad1.ts
#EXT-X-CUE-IN
#EXTINF:10.000,
post.ts
";

/// Playlist default key shared by two segments, then a key rotation
pub const MEDIA_ENCRYPTED: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-KEY:METHOD=AES-128,URI=\"https://example.com/key1.bin\"
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-TARGETDURATION:6
#EXTINF:6.000,
a.ts
#EXTINF:6.000,
b.ts
#EXT-X-KEY:METHOD=AES-128,URI=\"https://example.com/key2.bin\",IV=0x00000000000000000000000000000001
#EXTINF:6.000,
c.ts
";

/// Live fMP4 playlist with timestamps and an init segment change
pub const MEDIA_LIVE_FMP4: &str = "#EXTM3U
#EXT-X-VERSION:7
#EXT-X-INDEPENDENT-SEGMENTS
#EXT-X-MAP:URI=\"init.mp4\"
#EXT-X-MEDIA-SEQUENCE:2680
#EXT-X-TARGETDURATION:4
#EXT-X-START:TIME-OFFSET=12.5,PRECISE=YES
#EXT-X-DISCONTINUITY-SEQUENCE:3
#EXT-X-PROGRAM-DATE-TIME:2024-05-01T12:00:00Z
#EXTINF:4.000,
seg2680.m4s
#EXT-X-PROGRAM-DATE-TIME:2024-05-01T12:00:04Z
#EXTINF:4.000,
seg2681.m4s
#EXT-X-DISCONTINUITY
#EXT-X-MAP:URI=\"init2.mp4\"
#EXT-X-PROGRAM-DATE-TIME:2024-05-01T12:00:08Z
#EXTINF:3.500,
seg2682.m4s
";

/// Legacy Widevine header lines
pub const MEDIA_WIDEVINE: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-TARGETDURATION:10
#WV-AUDIO-CHANNELS 2
#WV-AUDIO-FORMAT 1
#WV-CYPHER-VERSION 1.0
#WV-VIDEO-RESOLUTION 1280x720
#EXTINF:10.000,
a.ts
";

/// Tags handled by the test plugins in `playlist::custom::testing`
pub const MEDIA_CUSTOM_TAGS: &str = "#EXTM3U
#EXT-X-VERSION:3
#CUSTOM-PLAYLIST-TAG:42
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-TARGETDURATION:10
#EXTINF:10.000,
a.ts
#CUSTOM-SEGMENT-TAG:NAME=\"Yoda\",JEDI=YES
#EXTINF:10.000,
b.ts
";

/// Broken numeric fields
pub const MALFORMED_MEDIA: &str = "#EXTM3U
#EXT-X-TARGETDURATION:10
#EXT-X-MEDIA-SEQUENCE:abc
#EXTINF:nine,
a.ts
#EXTINF:10.0,
b.ts
";

/// Master playlist with audio and subtitle renditions and an I-frame stream
pub const MASTER: &str = "#EXTM3U
#EXT-X-VERSION:4
#EXT-X-INDEPENDENT-SEGMENTS
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"aac\",LANGUAGE=\"en\",NAME=\"English\",DEFAULT=YES,AUTOSELECT=YES,URI=\"audio/en.m3u8\"
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"aac\",LANGUAGE=\"de\",NAME=\"Deutsch\",DEFAULT=NO,AUTOSELECT=YES,URI=\"audio/de.m3u8\"
#EXT-X-MEDIA:TYPE=SUBTITLES,GROUP-ID=\"subs\",LANGUAGE=\"en\",NAME=\"English\",DEFAULT=NO,AUTOSELECT=NO,URI=\"subs/en.m3u8\"
#EXT-X-STREAM-INF:BANDWIDTH=1280000,AVERAGE-BANDWIDTH=1100000,CODECS=\"avc1.4d401f,mp4a.40.2\",RESOLUTION=640x360,AUDIO=\"aac\",SUBTITLES=\"subs\",FRAME-RATE=25.000
low/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=3193687,AVERAGE-BANDWIDTH=3075600,CODECS=\"avc1.64001f,mp4a.40.2\",RESOLUTION=1280x720,AUDIO=\"aac\",CLOSED-CAPTIONS=NONE,SUBTITLES=\"subs\",FRAME-RATE=29.970
mid/index.m3u8
#EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=86000,CODECS=\"avc1.4d401f\",RESOLUTION=640x360,URI=\"low/iframe.m3u8\"
";
