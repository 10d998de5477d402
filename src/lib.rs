//! HLS playlist codec
//!
//! Builds, encodes and decodes M3U8 media and master playlists:
//! - Media playlists keep their segments in a fixed-capacity ring buffer and
//!   render a sliding window of them for live streams
//! - Decoding is line oriented, strict or lenient, and autodetects the
//!   playlist kind
//! - Protocol versions are raised automatically as features are used
//! - Unknown tags can be handled by caller-supplied plugins

pub mod config;
pub mod decode;
pub mod error;
pub mod playlist;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use config::{CodecConfig, DecodeConfig, EncodeConfig};
pub use decode::{decode, decode_reader, Decoder, Playlist};
pub use error::{PlaylistError, Result};
pub use playlist::{
    Alternative, CustomTag, CustomTagDecoder, MasterPlaylist, MediaPlaylist, MediaSegment,
    TagScope, Variant, VariantParams,
};
pub use types::{ByteRange, CueType, Key, ListType, Map, PlaylistType, Scte, ScteSyntax, WidevineMetadata};
