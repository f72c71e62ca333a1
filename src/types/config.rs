//! Configuration for Retro.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{RetroError, RetroResult};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// Main configuration for Retro.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Knowledge file settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Voice output settings.
    #[serde(default)]
    pub voice: VoiceConfig,

    /// QR code settings.
    #[serde(default)]
    pub qr: QrConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Knowledge file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Path of the JSON knowledge file.
    #[serde(default = "default_knowledge_path")]
    pub path: PathBuf,

    /// Start from an empty knowledge base when the file does not exist
    /// instead of failing at startup.
    #[serde(default)]
    pub create_if_missing: bool,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
            create_if_missing: false,
        }
    }
}

fn default_knowledge_path() -> PathBuf {
    PathBuf::from("retroai/knowledge.json")
}

/// Voice output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Play answers through a text-to-speech command.
    #[serde(default)]
    pub enabled: bool,

    /// Text-to-speech command. The text is passed as the last argument.
    #[serde(default = "default_voice_command")]
    pub command: String,

    /// Arguments placed before the text.
    #[serde(default = "default_voice_args")]
    pub args: Vec<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_voice_command(),
            args: default_voice_args(),
        }
    }
}

fn default_voice_command() -> String {
    "espeak".to_string()
}

fn default_voice_args() -> Vec<String> {
    // espeak speed in words per minute
    vec!["-s".to_string(), "150".to_string()]
}

/// QR code settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrConfig {
    /// Output file (SVG).
    #[serde(default = "default_qr_output")]
    pub output: PathBuf,

    /// Minimum width and height of the rendered image, in pixels.
    #[serde(default = "default_qr_min_dimension")]
    pub min_dimension: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            output: default_qr_output(),
            min_dimension: default_qr_min_dimension(),
        }
    }
}

fn default_qr_output() -> PathBuf {
    PathBuf::from("qrcode.svg")
}

fn default_qr_min_dimension() -> u32 {
    200
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// A relative knowledge path is resolved against the directory holding
    /// the configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> RetroResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if config.knowledge.path.is_relative() {
                config.knowledge.path = base.join(&config.knowledge.path);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RetroResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            knowledge: KnowledgeConfig::default(),
            voice: VoiceConfig::default(),
            qr: QrConfig::default(),
        }
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> RetroResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default_config())
        }
    }

    /// Checks values serde cannot check on its own.
    pub fn validate(&self) -> RetroResult<()> {
        if !LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(RetroError::config(format!(
                "unknown log_level '{}' (expected one of: {})",
                self.general.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        if !LOG_FORMATS.contains(&self.general.log_format.as_str()) {
            return Err(RetroError::config(format!(
                "unknown log_format '{}' (expected one of: {})",
                self.general.log_format,
                LOG_FORMATS.join(", ")
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
