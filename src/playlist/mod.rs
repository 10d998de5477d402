//! Playlist model and encoder
//!
//! - Media playlists backed by a segment ring buffer
//! - Master playlists with variants and alternative renditions
//! - Attribute-list parsing shared by both
//! - Custom tag plugin traits

pub mod attributes;
pub mod custom;
pub mod master;
pub mod media;
pub mod segment;
pub mod version;
mod writer;

pub use attributes::AttributeList;
pub use custom::{CustomTag, CustomTagDecoder, CustomTags, TagScope};
pub use master::{Alternative, MasterPlaylist, Variant, VariantParams};
pub use media::MediaPlaylist;
pub use segment::MediaSegment;
