//! Configuration system (layered: code > env > config file).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::error::{Result, SwarmError};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variables read by [`SwarmConfig::from_env`].
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "SWARM_MODEL";
pub const ENV_DEBUG: &str = "SWARM_DEBUG";

/// Settings for building a [`Swarm`](crate::core::Swarm).
///
/// Resolution order:
/// 1. Values set in code (`with_*`)
/// 2. Environment variables (and a `.env` file, via `dotenvy`)
/// 3. `~/.swarm/config.toml`
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model for agents built with [`SwarmConfig::agent`]; other agents keep
    /// their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub debug: bool,
}

impl fmt::Debug for SwarmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwarmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("debug", &self.debug)
            .finish()
    }
}

impl SwarmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables only.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::new().apply_env(|key| std::env::var(key).ok())
    }

    /// Load the default config file (if any), then overlay the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path())
    }

    /// Like [`load`](Self::load) with an explicit file path. A missing file is
    /// treated as empty.
    pub fn load_from(path: &Path) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let base = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::new()
        };
        Ok(base.apply_env(|key| std::env::var(key).ok()))
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            SwarmError::Configuration(format!("invalid config file {}: {e}", path.display()))
        })
    }

    /// Overlay values found by `lookup` onto this config.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty(ENV_BASE_URL) {
            self.base_url = Some(url);
        }
        if let Some(model) = non_empty(ENV_MODEL) {
            self.model = Some(model);
        }
        if let Some(flag) = non_empty(ENV_DEBUG) {
            self.debug = parse_flag(&flag);
        }
        self
    }

    /// Write this config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string(self)
            .map_err(|e| SwarmError::Configuration(format!("cannot serialize config: {e}")))?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// A new agent using the configured model, or the agent default.
    pub fn agent(&self, name: impl Into<String>) -> Agent {
        let agent = Agent::new(name);
        match self.model {
            Some(ref model) => agent.with_model(model.as_str()),
            None => agent,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// `~/.swarm/config.toml`, or `.swarm/config.toml` without a home directory.
pub fn default_config_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".swarm"))
        .unwrap_or_else(|| PathBuf::from(".swarm"))
        .join(CONFIG_FILE_NAME)
}

/// Whether `SWARM_DEBUG` asks for verbose run logging.
pub fn debug_enabled() -> bool {
    std::env::var(ENV_DEBUG).is_ok_and(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "True" | "yes")
}
