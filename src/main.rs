//! hls-playlist
//!
//! Decodes an M3U8 playlist of either kind and prints it back, re-encoded,
//! or as a JSON summary.
//!
//! Usage: `hls-playlist <playlist.m3u8> [config.toml]`

use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hls_playlist::config::{CodecConfig, OutputFormat};
use hls_playlist::{decode_reader, ListType, Playlist, Result};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "hls-playlist";

/// What `--summary` output reports
#[derive(Debug, Serialize)]
struct Summary {
    kind: String,
    version: u8,
    segments: Option<usize>,
    variants: Option<usize>,
    target_duration: Option<f64>,
    media_sequence: Option<u64>,
    closed: Option<bool>,
}

impl Summary {
    fn of(playlist: &Playlist) -> Self {
        match playlist {
            Playlist::Media(p) => Self {
                kind: ListType::Media.to_string(),
                version: p.version(),
                segments: Some(p.count()),
                variants: None,
                target_duration: Some(p.target_duration()),
                media_sequence: Some(p.media_sequence()),
                closed: Some(p.is_closed()),
            },
            Playlist::Master(p) => Self {
                kind: ListType::Master.to_string(),
                version: p.version(),
                segments: None,
                variants: Some(p.variants().len()),
                target_duration: None,
                media_sequence: None,
                closed: None,
            },
        }
    }
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(playlist_path) = args.next() else {
        eprintln!("Usage: {} <playlist.m3u8> [config.toml]", APP_NAME);
        return ExitCode::from(2);
    };
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());

    let (config, config_error) = load_config(&config_path);
    init_logging(&config);
    if let Some(e) = config_error {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            config_path,
            e
        );
    }
    tracing::debug!("{} v{} starting", APP_NAME, VERSION);

    match run(&playlist_path, &config) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(path = %playlist_path, error = %e, "Failed to decode playlist");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &str) -> (CodecConfig, Option<hls_playlist::PlaylistError>) {
    if !Path::new(path).exists() {
        return (CodecConfig::default(), None);
    }
    match CodecConfig::from_file(path) {
        Ok(config) => (config, None),
        Err(e) => (CodecConfig::default(), Some(e)),
    }
}

fn run(path: &str, config: &CodecConfig) -> Result<String> {
    let reader = BufReader::new(File::open(path)?);
    let mut playlist = decode_reader(reader, &config.decode, &[])?;
    if let Playlist::Media(p) = &mut playlist {
        p.apply_encode_config(&config.encode);
    }
    tracing::info!(kind = %playlist.list_type(), "Decoded {}", path);

    match config.output {
        OutputFormat::M3u8 => Ok(playlist.encode().to_string()),
        OutputFormat::Summary => {
            let summary = Summary::of(&playlist);
            let json = serde_json::to_string_pretty(&summary)?;
            Ok(json + "\n")
        }
    }
}

/// Initialize logging with tracing
fn init_logging(config: &CodecConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_directive().into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
