//! Configuration
//!
//! Centralized configuration for the scan core: capture-window timing and
//! provider endpoints/credentials. Values layer with the usual priority
//! (highest first): environment variables, TOML configuration file,
//! defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! [scan]
//! window_ms = 20000
//! sample_interval_ms = 2000
//!
//! [providers]
//! detector_endpoint = "http://localhost:5000/detect_emotion"
//! books_endpoint = "https://www.googleapis.com/books/v1/volumes"
//! books_max_results = 5
//! chat_endpoint = "https://openrouter.ai/api/v1/chat/completions"
//! chat_model = "openai/gpt-3.5-turbo"
//! video_endpoint = "https://www.googleapis.com/youtube/v3/search"
//! video_max_results = 2
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Scan section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanToml {
    /// Capture window length in milliseconds
    pub window_ms: Option<u64>,
    /// Capture tick interval in milliseconds
    pub sample_interval_ms: Option<u64>,
}

/// Providers section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersToml {
    /// Emotion detector endpoint
    pub detector_endpoint: Option<String>,
    /// Book search endpoint
    pub books_endpoint: Option<String>,
    /// Maximum book results per query
    pub books_max_results: Option<u32>,
    /// Chat-completions endpoint for exercise suggestions
    pub chat_endpoint: Option<String>,
    /// Model identifier for the chat endpoint
    pub chat_model: Option<String>,
    /// Bearer token for the chat endpoint
    pub chat_api_key: Option<String>,
    /// Video search endpoint
    pub video_endpoint: Option<String>,
    /// API key for the video search endpoint
    pub video_api_key: Option<String>,
    /// Maximum video results per query
    pub video_max_results: Option<u32>,
}

/// Root TOML configuration file structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VibeSyncToml {
    /// Scan timing section
    pub scan: ScanToml,
    /// Provider endpoints section
    pub providers: ProvidersToml,
}

/// Resolved scan timing configuration
#[derive(Clone, Debug)]
pub struct ScanConfig {
    /// Capture window length
    pub window: Duration,
    /// Capture tick interval
    pub sample_interval: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(20_000),
            sample_interval: Duration::from_millis(2_000),
        }
    }
}

impl ScanConfig {
    /// Create configuration from environment variables
    ///
    /// Reads `VIBESYNC_WINDOW_MS` and `VIBESYNC_SAMPLE_INTERVAL_MS`;
    /// unset or unparsable values keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        merge_env_scan(Self::default())
    }

    /// Apply a TOML section over this configuration
    #[must_use]
    pub fn with_toml(mut self, toml: &ScanToml) -> Self {
        if let Some(ms) = toml.window_ms {
            self.window = Duration::from_millis(ms);
        }
        if let Some(ms) = toml.sample_interval_ms {
            self.sample_interval = Duration::from_millis(ms);
        }
        self
    }

    /// Validate timing invariants
    ///
    /// The interval must be nonzero and no longer than the window, so the
    /// sample buffer is bounded by `window / interval`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "sample_interval_ms must be nonzero".to_string(),
            ));
        }
        if self.sample_interval > self.window {
            return Err(ConfigError::ValidationError(format!(
                "sample_interval_ms ({}) exceeds window_ms ({})",
                self.sample_interval.as_millis(),
                self.window.as_millis()
            )));
        }
        Ok(())
    }

    /// The maximum number of samples one window can collect
    #[must_use]
    pub fn max_samples(&self) -> usize {
        (self.window.as_millis() / self.sample_interval.as_millis().max(1)) as usize
    }
}

/// Resolved provider configuration
#[derive(Clone, Debug)]
pub struct ProvidersConfig {
    /// Emotion detector endpoint
    pub detector_endpoint: String,
    /// Book search endpoint
    pub books_endpoint: String,
    /// Maximum book results per query
    pub books_max_results: u32,
    /// Chat-completions endpoint for exercise suggestions
    pub chat_endpoint: String,
    /// Model identifier for the chat endpoint
    pub chat_model: String,
    /// Bearer token for the chat endpoint (absent key: that slot resolves empty)
    pub chat_api_key: Option<String>,
    /// Video search endpoint
    pub video_endpoint: String,
    /// API key for the video search endpoint
    pub video_api_key: Option<String>,
    /// Maximum video results per query
    pub video_max_results: u32,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            detector_endpoint: "http://localhost:5000/detect_emotion".to_string(),
            books_endpoint: "https://www.googleapis.com/books/v1/volumes".to_string(),
            books_max_results: 5,
            chat_endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            chat_model: "openai/gpt-3.5-turbo".to_string(),
            chat_api_key: None,
            video_endpoint: "https://www.googleapis.com/youtube/v3/search".to_string(),
            video_api_key: None,
            video_max_results: 2,
        }
    }
}

impl ProvidersConfig {
    /// Create configuration from environment variables
    ///
    /// Endpoint overrides use `VIBESYNC_*_ENDPOINT`; credentials use
    /// `VIBESYNC_CHAT_API_KEY` and `VIBESYNC_VIDEO_API_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        merge_env_providers(Self::default())
    }

    /// Apply a TOML section over this configuration
    #[must_use]
    pub fn with_toml(mut self, toml: &ProvidersToml) -> Self {
        if let Some(ref v) = toml.detector_endpoint {
            self.detector_endpoint = v.clone();
        }
        if let Some(ref v) = toml.books_endpoint {
            self.books_endpoint = v.clone();
        }
        if let Some(v) = toml.books_max_results {
            self.books_max_results = v;
        }
        if let Some(ref v) = toml.chat_endpoint {
            self.chat_endpoint = v.clone();
        }
        if let Some(ref v) = toml.chat_model {
            self.chat_model = v.clone();
        }
        if let Some(ref v) = toml.chat_api_key {
            self.chat_api_key = Some(v.clone());
        }
        if let Some(ref v) = toml.video_endpoint {
            self.video_endpoint = v.clone();
        }
        if let Some(ref v) = toml.video_api_key {
            self.video_api_key = Some(v.clone());
        }
        if let Some(v) = toml.video_max_results {
            self.video_max_results = v;
        }
        self
    }
}

/// Fully resolved configuration
#[derive(Clone, Debug, Default)]
pub struct VibeSyncConfig {
    /// Scan timing
    pub scan: ScanConfig,
    /// Provider endpoints and credentials
    pub providers: ProvidersConfig,
}

/// Load configuration from a TOML file, then layer environment overrides
///
/// Missing file fields fall back to defaults; environment variables win
/// over the file. The resolved scan timing is validated before returning.
pub fn load_config_from_path(path: &Path) -> Result<VibeSyncConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let file: VibeSyncToml = toml::from_str(&contents)?;

    // Defaults < file < environment.
    let scan = merge_env_scan(ScanConfig::default().with_toml(&file.scan));
    let providers = merge_env_providers(ProvidersConfig::default().with_toml(&file.providers));

    scan.validate()?;

    Ok(VibeSyncConfig { scan, providers })
}

/// Build configuration from environment and defaults only (no file)
#[must_use]
pub fn load_config() -> VibeSyncConfig {
    VibeSyncConfig {
        scan: ScanConfig::from_env(),
        providers: ProvidersConfig::from_env(),
    }
}

/// The variable's value, if it is set
fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// The variable parsed as `T`, if it is set and parses
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// The variable parsed as a millisecond duration, if it is set and parses
fn env_millis(name: &str) -> Option<Duration> {
    env_parse(name).map(Duration::from_millis)
}

// Env layering keys off variable presence, never value comparison: a
// variable explicitly set to the default still overrides a file value.

fn merge_env_scan(base: ScanConfig) -> ScanConfig {
    ScanConfig {
        window: env_millis("VIBESYNC_WINDOW_MS").unwrap_or(base.window),
        sample_interval: env_millis("VIBESYNC_SAMPLE_INTERVAL_MS").unwrap_or(base.sample_interval),
    }
}

fn merge_env_providers(base: ProvidersConfig) -> ProvidersConfig {
    ProvidersConfig {
        detector_endpoint: env_string("VIBESYNC_DETECTOR_ENDPOINT")
            .unwrap_or(base.detector_endpoint),
        books_endpoint: env_string("VIBESYNC_BOOKS_ENDPOINT").unwrap_or(base.books_endpoint),
        books_max_results: env_parse("VIBESYNC_BOOKS_MAX_RESULTS")
            .unwrap_or(base.books_max_results),
        chat_endpoint: env_string("VIBESYNC_CHAT_ENDPOINT").unwrap_or(base.chat_endpoint),
        chat_model: env_string("VIBESYNC_CHAT_MODEL").unwrap_or(base.chat_model),
        chat_api_key: env_string("VIBESYNC_CHAT_API_KEY").or(base.chat_api_key),
        video_endpoint: env_string("VIBESYNC_VIDEO_ENDPOINT").unwrap_or(base.video_endpoint),
        video_api_key: env_string("VIBESYNC_VIDEO_API_KEY").or(base.video_api_key),
        video_max_results: env_parse("VIBESYNC_VIDEO_MAX_RESULTS")
            .unwrap_or(base.video_max_results),
    }
}
