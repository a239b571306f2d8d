//! # Configuration
//!
//! TOML configuration for the profile manager, organised into sections:
//!
//! - [`ProfileConfig`] - where the profile slot lives and how imports are checked
//! - [`LoggingConfig`] - log level and optional log file
//! - [`AdviceConfig`] - the text-generation advice service
//!
//! ```toml
//! [profile]
//! data_dir = "./data"
//! slot_key = "aetheria_profile"
//! backend = "file"        # or "sled"
//! strict_import = true
//!
//! [logging]
//! level = "info"
//! file = "aetheria.log"
//!
//! [advice]
//! enabled = false
//! api_key = ""
//! ```
//!
//! Every section has defaults, so a partial file (or none at all, via
//! [`Config::load_or_default`]) is valid. The advice API key may also come from
//! the `AETHERIA_API_KEY` environment variable, which wins over the file.

use anyhow::{anyhow, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::profile::{FileSlot, ImportPolicy, ProfileStore, ProfileStoreBuilder, SledSlot, DEFAULT_SLOT_KEY};

/// Environment variable that overrides `advice.api_key`.
pub const API_KEY_ENV: &str = "AETHERIA_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlotBackend {
    /// `<data_dir>/<slot_key>.json`
    #[default]
    File,
    /// `<data_dir>/sled`, one key in the `aetheria` tree
    Sled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_slot_key")]
    pub slot_key: String,
    #[serde(default)]
    pub backend: SlotBackend,
    /// Reject imported documents that break profile rules (level, specialty,
    /// chronicle cap and ordering). When false any well-shaped document is accepted.
    #[serde(default = "default_strict_import")]
    pub strict_import: bool,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_slot_key() -> String {
    DEFAULT_SLOT_KEY.to_string()
}

fn default_strict_import() -> bool {
    true
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            slot_key: default_slot_key(),
            backend: SlotBackend::default(),
            strict_import: default_strict_import(),
        }
    }
}

impl ProfileConfig {
    pub fn import_policy(&self) -> ImportPolicy {
        if self.strict_import {
            ImportPolicy::Strict
        } else {
            ImportPolicy::Permissive
        }
    }

    pub fn sled_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("sled")
    }

    /// Open the profile store over the configured slot backend.
    pub fn open_store(&self) -> Result<ProfileStore> {
        if self.slot_key.trim().is_empty() {
            return Err(anyhow!("profile.slot_key cannot be empty"));
        }
        let builder = match self.backend {
            SlotBackend::File => ProfileStoreBuilder::new(FileSlot::open(&self.data_dir, &self.slot_key)?),
            SlotBackend::Sled => ProfileStoreBuilder::new(SledSlot::open(self.sled_path(), &self.slot_key)?),
        };
        debug!("opening profile store ({:?} backend)", self.backend);
        Ok(builder.import_policy(self.import_policy()).open()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Parsed level; unknown strings fall back to `info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    /// Enable/disable network advice; disabled means fallback text only
    pub enabled: bool,
    /// Text-generation API key (overridden by `AETHERIA_API_KEY`)
    pub api_key: String,
    /// Base URL of the generative language API
    pub endpoint: String,
    pub model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// How long a briefing for the same name and level is reused (0 disables)
    pub briefing_cache_minutes: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            enabled: false, // Disabled by default until an API key is provided
            api_key: String::new(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            timeout_seconds: 15,
            briefing_cache_minutes: 10,
            temperature: 0.8,
            top_p: 0.95,
            max_output_tokens: 1000,
        }
    }
}

impl AdviceConfig {
    /// API key from the environment if set, else from the file.
    pub fn resolved_api_key(&self) -> String {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => self.api_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.enabled && !self.resolved_api_key().trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub advice: AdviceConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;
        Self::parse(&content).map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            debug!("config file {} not found; using defaults", path);
            return Ok(Config::default());
        }
        Self::load(path).await
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;
        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;
        Ok(())
    }
}
