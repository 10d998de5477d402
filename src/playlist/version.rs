//! Protocol version ratchet
//!
//! A playlist's `#EXT-X-VERSION` must be at least the minimum required by
//! every feature it uses. Versions are raised when a feature is set and
//! never lowered.

use crate::types::Key;

/// Baseline: floating-point `#EXTINF` durations
pub const MIN_VERSION: u8 = 3;
/// `IV` attribute on `#EXT-X-KEY`
pub const VERSION_KEY_IV: u8 = 2;
/// Byte ranges, I-frame streams, `#EXT-X-MEDIA`, AUDIO/VIDEO group references
pub const VERSION_BYTE_RANGE: u8 = 4;
pub const VERSION_I_FRAMES: u8 = 4;
pub const VERSION_ALTERNATIVES: u8 = 4;
pub const VERSION_GROUP_REFERENCE: u8 = 4;
/// `KEYFORMAT` / `KEYFORMATVERSIONS`, `#EXT-X-MAP`
pub const VERSION_KEY_FORMAT: u8 = 5;
pub const VERSION_MAP: u8 = 5;
/// `VIDEO-RANGE`, `HDCP-LEVEL`
pub const VERSION_VIDEO_RANGE: u8 = 7;

/// Raise `version` in place to at least `required`.
pub fn ratchet(version: &mut u8, required: u8) {
    if *version < required {
        *version = required;
    }
}

/// Minimum version a key's attributes need
pub fn key_version(key: &Key) -> u8 {
    if key.keyformat.is_some() || key.keyformatversions.is_some() {
        VERSION_KEY_FORMAT
    } else if key.iv.is_some() {
        VERSION_KEY_IV
    } else {
        0
    }
}
