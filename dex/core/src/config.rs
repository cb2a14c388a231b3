//! TOML Configuration File Support
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/dex/dex.toml`
//! (typically `~/.config/dex/dex.toml`).
//!
//! # Configuration Priority
//!
//! Highest first:
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://pokeapi.co/api/v2"
//! timeout_secs = 15
//!
//! [animation]
//! frame_interval_ms = 1000
//!
//! [audio]
//! enabled = true
//! command = ["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet"]
//!
//! [lookup]
//! discard_stale_responses = false
//! ```
//!
//! # Environment Variables
//!
//! - `DEX_API_URL`, `DEX_API_TIMEOUT_SECS`
//! - `DEX_FRAME_INTERVAL_MS`
//! - `DEX_AUDIO` (`0`/`false` mutes), `DEX_AUDIO_COMMAND` (whitespace separated)
//! - `DEX_DISCARD_STALE`

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::DEFAULT_FRAME_INTERVAL;
use crate::audio::DEFAULT_PLAYER_COMMAND;
use crate::client::DEFAULT_API_URL;
use crate::controller::LookupConfig;

// =============================================================================
// Error Types
// =============================================================================

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

/// Where the effective configuration came from (highest layer applied)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[api]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Base URL of the data service
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[animation]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationToml {
    /// Delay between frame advances in milliseconds
    pub frame_interval_ms: Option<u64>,
}

/// `[audio]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioToml {
    /// Whether cries are played
    pub enabled: Option<bool>,
    /// Player command line; the clip URL is appended
    pub command: Option<Vec<String>>,
}

/// `[lookup]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupToml {
    /// Drop completions of superseded lookups
    pub discard_stale_responses: Option<bool>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DexToml {
    /// Data service section
    pub api: ApiToml,
    /// Animation section
    pub animation: AnimationToml,
    /// Audio section
    pub audio: AudioToml,
    /// Lookup behaviour section
    pub lookup: LookupToml,
}

// =============================================================================
// Effective Configuration
// =============================================================================

/// Effective configuration after all layers are applied
#[derive(Clone, Debug)]
pub struct DexConfig {
    /// Base URL of the data service
    pub api_url: String,
    /// Per-request timeout
    pub api_timeout: Duration,
    /// Delay between frame advances
    pub frame_interval: Duration,
    /// Whether cries are played
    pub audio_enabled: bool,
    /// Player command line
    pub audio_command: Vec<String>,
    /// Drop completions of superseded lookups
    pub discard_stale_responses: bool,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_timeout: Duration::from_secs(15),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            audio_enabled: true,
            audio_command: DEFAULT_PLAYER_COMMAND
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            discard_stale_responses: false,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl DexConfig {
    /// Highest layer that contributed a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Settings the controller needs
    #[must_use]
    pub fn lookup_config(&self) -> LookupConfig {
        LookupConfig {
            frame_interval: self.frame_interval,
            discard_stale_responses: self.discard_stale_responses,
        }
    }

    /// Reject values the rest of the program cannot work with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api base_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.api_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "api timeout must be greater than zero".to_string(),
            ));
        }
        if self.frame_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "animation frame interval must be greater than zero".to_string(),
            ));
        }
        if self.audio_enabled && self.audio_command.first().map_or(true, String::is_empty) {
            return Err(ConfigError::ValidationError(
                "audio command must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Default configuration file path
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dex").join("dex.toml"))
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
/// A missing config file is not an error.
pub fn load_config() -> Result<DexConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<DexConfig, ConfigError> {
    let mut config = DexConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: DexToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(path = %config_path.display(), "Loaded configuration from file");
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

fn apply_toml_config(config: &mut DexConfig, toml: &DexToml) {
    if let Some(ref url) = toml.api.base_url {
        config.api_url.clone_from(url);
    }
    if let Some(secs) = toml.api.timeout_secs {
        config.api_timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = toml.animation.frame_interval_ms {
        config.frame_interval = Duration::from_millis(ms);
    }
    if let Some(enabled) = toml.audio.enabled {
        config.audio_enabled = enabled;
    }
    if let Some(ref command) = toml.audio.command {
        config.audio_command.clone_from(command);
    }
    if let Some(discard) = toml.lookup.discard_stale_responses {
        config.discard_stale_responses = discard;
    }
}

fn parse_flag(value: &str) -> bool {
    value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Apply environment overrides read through `var`
fn apply_env_config(config: &mut DexConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(url) = var("DEX_API_URL") {
        config.api_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(secs) = var("DEX_API_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
        config.api_timeout = Duration::from_secs(secs);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = var("DEX_FRAME_INTERVAL_MS").and_then(|v| v.parse::<u64>().ok()) {
        config.frame_interval = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(flag) = var("DEX_AUDIO") {
        config.audio_enabled = parse_flag(&flag);
        config.source = ConfigSource::Env;
    }
    if let Some(command) = var("DEX_AUDIO_COMMAND") {
        config.audio_command = command.split_whitespace().map(str::to_string).collect();
        config.source = ConfigSource::Env;
    }
    if let Some(flag) = var("DEX_DISCARD_STALE") {
        config.discard_stale_responses = parse_flag(&flag);
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Command-line overrides, applied after [`load_config`]
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Data service base URL
    pub api_url: Option<String>,
    /// Frame interval in milliseconds
    pub frame_interval_ms: Option<u64>,
    /// Force audio off
    pub mute: bool,
}

impl ConfigOverrides {
    /// Create an empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the data service base URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Override the frame interval
    #[must_use]
    pub fn with_frame_interval_ms(mut self, ms: u64) -> Self {
        self.frame_interval_ms = Some(ms);
        self
    }

    /// Force audio off
    #[must_use]
    pub fn with_mute(mut self, mute: bool) -> Self {
        self.mute = mute;
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut DexConfig) {
        if self.api_url.is_some() || self.frame_interval_ms.is_some() || self.mute {
            config.source = ConfigSource::Cli;
        }
        if let Some(ref url) = self.api_url {
            config.api_url.clone_from(url);
        }
        if let Some(ms) = self.frame_interval_ms {
            config.frame_interval = Duration::from_millis(ms);
        }
        if self.mute {
            config.audio_enabled = false;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
