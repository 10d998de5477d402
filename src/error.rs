use thiserror::Error;

/// Boxed error returned by custom tag decoders
pub type CustomTagError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for playlist building, decoding and configuration
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// No free slot left in the segment ring buffer
    #[error("playlist is full")]
    PlaylistFull,

    /// Remove or mutate-last-segment on a buffer without segments
    #[error("playlist is empty")]
    PlaylistEmpty,

    #[error("capacity {capacity} must not be less than window size {window_size}")]
    InvalidCapacity { capacity: usize, window_size: usize },

    /// A directive field could not be parsed
    #[error("invalid {field} in line {line:?}: {reason}")]
    Format {
        line: String,
        field: &'static str,
        reason: String,
    },

    #[error("unable to detect playlist type")]
    UnknownPlaylistType,

    #[error("#EXTM3U absent")]
    MissingStartTag,

    /// Error propagated verbatim from a custom tag decoder
    #[error("custom tag {tag} failed to decode: {source}")]
    CustomTagDecode {
        tag: String,
        #[source]
        source: CustomTagError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Summary serialization error: {0}")]
    Summary(#[from] serde_json::Error),
}

impl PlaylistError {
    /// Build a format error for `field` in `line`.
    pub fn format(line: &str, field: &'static str, reason: impl ToString) -> Self {
        Self::Format {
            line: line.to_string(),
            field,
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PlaylistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = PlaylistError::format("#EXTINF:abc,", "duration", "invalid float literal");
        assert_eq!(
            err.to_string(),
            "invalid duration in line \"#EXTINF:abc,\": invalid float literal"
        );
    }

    #[test]
    fn test_invalid_capacity_display() {
        let err = PlaylistError::InvalidCapacity {
            capacity: 1,
            window_size: 3,
        };
        assert_eq!(
            err.to_string(),
            "capacity 1 must not be less than window size 3"
        );
    }

    #[test]
    fn test_json_error_is_not_io() {
        let err: PlaylistError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(err, PlaylistError::Summary(_)));
        assert!(err.to_string().starts_with("Summary serialization error"));
    }
}
