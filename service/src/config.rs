use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use common::RetryPolicy;
use std::fs;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Use the built-in keyword moderator instead of calling the API.
    #[serde(default)]
    pub mock_mode: bool,
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_api_url() -> String { "https://api.example.com".to_string() }
fn default_timeout_ms() -> u64 { common::DEFAULT_MODERATION_TIMEOUT_MS }

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: String::new(),
            timeout_ms: default_timeout_ms(),
            mock_mode: false,
            retry: RetryPolicy::default(),
        }
    }
}

impl ModerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,
}

fn default_avatar_base_url() -> String { common::DEFAULT_AVATAR_BASE_URL.to_string() }

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            avatar_base_url: default_avatar_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub output: Option<PathBuf>,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub moderation: ModerationConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Detect file type by extension and load
    pub fn from_file(path: &Path) -> Result<Self> {
        let ext = path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match ext {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "toml" => Self::from_toml_file(path),
            _ => Err(anyhow::anyhow!("Unsupported config file format. Use .yaml, .yml, or .toml")),
        }
    }

    /// Apply `AVATAR_*` environment overrides on top of file values.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("AVATAR_MODERATION_URL") {
            self.moderation.api_url = url;
        }
        if let Some(token) = lookup("AVATAR_API_TOKEN") {
            self.moderation.api_token = token;
        }
        if let Some(flag) = lookup("AVATAR_MOCK_MODERATION") {
            self.moderation.mock_mode = matches!(flag.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    /// Endpoint and credential are both required, whichever moderator runs.
    pub fn validate(&self) -> Result<()> {
        if self.moderation.api_url.trim().is_empty() {
            bail!("moderation.api_url must be set");
        }
        if self.moderation.api_token.trim().is_empty() {
            bail!("moderation.api_token must be set (or AVATAR_API_TOKEN)");
        }
        if self.moderation.timeout_ms == 0 {
            bail!("moderation.timeout_ms must be greater than zero");
        }
        Ok(())
    }
}
