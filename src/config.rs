//! Codec configuration
//!
//! Loads decoder, encoder and logging settings from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Decoder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Abort on the first malformed field instead of skipping it
    pub strict: bool,

    /// Initial ring buffer capacity for media playlists of unknown length
    pub initial_capacity: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            strict: false,
            initial_capacity: 1024,
        }
    }
}

impl DecodeConfig {
    /// Strict decoding with default capacity
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Default::default()
        }
    }
}

/// Encoder configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Render `#EXTINF` durations as rounded-up integers instead of `%.3f`
    pub duration_as_int: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// What the command-line tool prints after decoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Re-encoded playlist text
    #[default]
    M3u8,
    /// JSON summary of the decoded playlist
    Summary,
}

/// Codec configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub decode: DecodeConfig,
    pub encode: EncodeConfig,
    pub logging: LoggingConfig,
    pub output: OutputFormat,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: CodecConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Default `EnvFilter` directive for the configured log level
    pub fn log_directive(&self) -> String {
        format!("hls_playlist={}", self.logging.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert!(!config.decode.strict);
        assert_eq!(config.decode.initial_capacity, 1024);
        assert!(!config.encode.duration_as_int);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output, OutputFormat::M3u8);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"output = \"summary\"\n\n[decode]\nstrict = true\n")
            .unwrap();

        let config = CodecConfig::from_file(temp_file.path()).unwrap();
        assert!(config.decode.strict);
        assert_eq!(config.decode.initial_capacity, 1024);
        assert_eq!(config.output, OutputFormat::Summary);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_file_roundtrip() {
        let mut config = CodecConfig::default();
        config.encode.duration_as_int = true;
        config.logging.level = "debug".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        config.to_file(temp_file.path()).unwrap();

        let loaded = CodecConfig::from_file(temp_file.path()).unwrap();
        assert!(loaded.encode.duration_as_int);
        assert_eq!(loaded.log_directive(), "hls_playlist=debug");
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[decode\nstrict = ").unwrap();

        let err = CodecConfig::from_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, crate::error::PlaylistError::ConfigParse(_)));
    }
}
