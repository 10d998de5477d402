//! End-to-end tests
//!
//! - Decoding sample playlists and re-encoding them unchanged
//! - Building live playlists through the public API
//! - Structural validation of everything the encoder writes

pub mod fixtures;
pub mod validation;
