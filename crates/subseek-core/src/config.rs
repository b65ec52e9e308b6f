//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, index, tool and clip settings. Every section defaults sensibly so
//! a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::{ClipKind, Error};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub index: IndexConfig,
    pub tools: ToolsConfig,
    pub clips: ClipsConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.index.extensions.is_empty() {
            warnings.push("index.extensions is empty; no subtitle files will be indexed".into());
        }

        if self.index.default_limit == 0 {
            warnings.push("index.default_limit is 0; searches will return nothing".into());
        }

        if self.clips.padding_secs < 0.0 {
            warnings.push(format!(
                "clips.padding_secs is negative ({}); clips will be shorter than the dialogue",
                self.clips.padding_secs
            ));
        }

        if self.clips.max_files == 0 {
            warnings.push("clips.max_files is 0; every clip is deleted right after it is made".into());
        }

        for kind in [ClipKind::Audio, ClipKind::Video] {
            let source = self.clips.source(kind);
            if source.candidates.is_empty() {
                warnings.push(format!("clips.{kind}.candidates is empty"));
            }
            if source.timeout_secs == 0 {
                warnings.push(format!("clips.{kind}.timeout_secs is 0"));
            }
            if source.url_prefix.trim_matches('/').is_empty() {
                warnings.push(format!("clips.{kind}.url_prefix is empty"));
            }
        }

        if self.clips.audio.url_prefix.trim_matches('/')
            == self.clips.video.url_prefix.trim_matches('/')
        {
            warnings.push("clips.audio and clips.video share the same url_prefix".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Optional directory served as the fallback for unmatched paths.
    pub static_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            db_path: PathBuf::from("subtitle_index.db"),
            static_dir: None,
            cors_origins: vec![
                "http://localhost:5173".into(),
                "http://localhost:3000".into(),
            ],
        }
    }
}

/// Index build and search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub source_dir: PathBuf,
    /// File extensions (without the dot) picked up by a rebuild.
    pub extensions: Vec<String>,
    pub default_limit: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("data"),
            extensions: vec!["ass".into()],
            default_limit: 5000,
        }
    }
}

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
}

/// Clip extraction settings shared by audio and video.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipsConfig {
    /// Seconds added on both sides of the dialogue window.
    pub padding_secs: f64,
    pub cleanup_after_hours: u64,
    /// Newest clips kept per directory after each extraction.
    pub max_files: usize,
    #[serde(default = "ClipSourceConfig::audio")]
    pub audio: ClipSourceConfig,
    #[serde(default = "ClipSourceConfig::video")]
    pub video: ClipSourceConfig,
}

impl Default for ClipsConfig {
    fn default() -> Self {
        Self {
            padding_secs: 2.0,
            cleanup_after_hours: 24,
            max_files: 10,
            audio: ClipSourceConfig::audio(),
            video: ClipSourceConfig::video(),
        }
    }
}

impl ClipsConfig {
    pub fn source(&self, kind: ClipKind) -> &ClipSourceConfig {
        match kind {
            ClipKind::Audio => &self.audio,
            ClipKind::Video => &self.video,
        }
    }
}

/// Where source media lives for one clip kind and where its clips go.
///
/// `candidates` are filename templates relative to `media_dir`. They accept
/// `{season}`, `{episode}` and the zero-padded `{season:02}`/`{episode:02}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipSourceConfig {
    pub media_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub url_prefix: String,
    pub candidates: Vec<String>,
    pub extension: String,
    pub timeout_secs: u64,
}

impl ClipSourceConfig {
    fn audio() -> Self {
        Self {
            media_dir: PathBuf::from("audio"),
            temp_dir: PathBuf::from("temp_audio"),
            url_prefix: "temp_audio".into(),
            candidates: vec![
                "音频-S{season:02}/小谢尔顿-S{season:02}E{episode:02}-音频.mp3".into(),
                "音频-S{season:02}/小谢尔顿-S{season:02}E{episode:02}.mp3".into(),
            ],
            extension: "mp3".into(),
            timeout_secs: 30,
        }
    }

    fn video() -> Self {
        Self {
            media_dir: PathBuf::from("video"),
            temp_dir: PathBuf::from("temp_video"),
            url_prefix: "temp_video".into(),
            candidates: vec!["S{season:02}.{episode:02}.mkv".into()],
            extension: "mp4".into(),
            timeout_secs: 60,
        }
    }
}
