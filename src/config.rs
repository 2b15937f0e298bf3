//! Configuration types for media-dl

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, path::PathBuf};
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::format::DEFAULT_QUALITY;

/// Download behavior configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Directory the engine writes finished files into (default: system temp dir)
    #[serde(default = "default_output_dir")]
    #[schema(value_type = String)]
    pub output_dir: PathBuf,

    /// Quality label used when a request does not name one (default: "720p")
    #[serde(default = "default_quality")]
    pub default_quality: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_quality: default_quality(),
        }
    }
}

/// Fetch engine (yt-dlp) settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EngineConfig {
    /// Path to the yt-dlp executable (auto-detected if None)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub binary_path: Option<PathBuf>,

    /// Whether to search PATH for the binary if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Netscape-format cookie file passed to the engine when it exists
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub cookie_file: Option<PathBuf>,

    /// Retries for a failed download (default: 10)
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Retries for a failed fragment (default: 10)
    #[serde(default = "default_retries")]
    pub fragment_retries: u32,

    /// Fragments fetched in parallel for video downloads (default: 4)
    #[serde(default = "default_concurrent_fragments")]
    pub concurrent_fragments: u32,

    /// Codec audio jobs are converted to (default: "mp3")
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate in kbit/s (default: 192)
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate_kbps: u32,

    /// Container merged video is written as (default: "mp4")
    #[serde(default = "default_merge_format")]
    pub merge_output_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            search_path: true,
            cookie_file: None,
            retries: default_retries(),
            fragment_retries: default_retries(),
            concurrent_fragments: default_concurrent_fragments(),
            audio_codec: default_audio_codec(),
            audio_bitrate_kbps: default_audio_bitrate(),
            merge_output_format: default_merge_format(),
        }
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for MediaDownloader
///
/// - [`download`](DownloadConfig) - output directory, default quality
/// - [`engine`](EngineConfig) - yt-dlp binary, cookie file, fetch options
/// - [`server`](ServerIntegrationConfig) - REST API
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Download behavior settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Fetch engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// API and external server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.download.output_dir.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "output directory must not be empty".to_string(),
                key: Some("download.output_dir".to_string()),
            });
        }
        if self.engine.concurrent_fragments == 0 {
            return Err(Error::Config {
                message: "concurrent_fragments must be at least 1".to_string(),
                key: Some("engine.concurrent_fragments".to_string()),
            });
        }
        if self.engine.audio_codec.trim().is_empty() {
            return Err(Error::Config {
                message: "audio_codec must not be empty".to_string(),
                key: Some("engine.audio_codec".to_string()),
            });
        }
        Ok(())
    }

    /// Directory finished files are written into
    pub fn output_dir(&self) -> &PathBuf {
        &self.download.output_dir
    }
}

fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("media-dl")
}

fn default_quality() -> String {
    DEFAULT_QUALITY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_retries() -> u32 {
    10
}

fn default_concurrent_fragments() -> u32 {
    4
}

fn default_audio_codec() -> String {
    "mp3".to_string()
}

fn default_audio_bitrate() -> u32 {
    192
}

fn default_merge_format() -> String {
    "mp4".to_string()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}
