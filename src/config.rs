use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Overrides the stored key of the active provider.
pub const API_KEY_ENV: &str = "DEV_HELPER_API_KEY";

#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
pub struct Config {
    #[serde(default)]
    #[validate]
    pub ai: AIConfig,
    #[serde(default)]
    #[validate]
    pub git: GitConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct AIConfig {
    pub provider: AIProvider,
    #[validate(length(min = 1, message = "Model name cannot be empty"))]
    pub model: String,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            provider: AIProvider::OpenAI,
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1024,
            openai_api_key: None,
            anthropic_api_key: None,
            api_url: None,
        }
    }
}

impl AIConfig {
    /// Key for the active provider, if one is stored.
    pub fn api_key(&self) -> Option<&str> {
        let key = match self.provider {
            AIProvider::OpenAI => &self.openai_api_key,
            AIProvider::Anthropic => &self.anthropic_api_key,
        };
        key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, key: Option<String>) {
        match self.provider {
            AIProvider::OpenAI => self.openai_api_key = key,
            AIProvider::Anthropic => self.anthropic_api_key = key,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AIProvider {
    OpenAI,
    Anthropic,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct GitConfig {
    /// Commits shown per page in the log panel.
    #[validate(range(min = 1, max = 500, message = "log_limit must be between 1 and 500"))]
    pub log_limit: usize,
    #[validate(length(min = 1, message = "Git binary cannot be empty"))]
    pub binary: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            log_limit: 50,
            binary: "git".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    pub color_output: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color_output: true }
    }
}

impl Config {
    pub fn create_default(path: &Path) -> Result<()> {
        Config::default().save(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config at {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config at {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Loads the config at `path`, writing the defaults first if it does not exist.
    ///
    /// An API key from the environment wins over the stored one.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("creating default config at {:?}", path);
            Self::create_default(path)?;
        }

        let mut config = Self::load(path)?;
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.ai.set_api_key(Some(key));
            }
        }
        Ok(config)
    }

    /// Removes the stored key of the active provider from the file at `path`.
    pub fn clear_api_key(path: &Path) -> Result<()> {
        let mut config = Self::load_or_create(path)?;
        config.ai.set_api_key(None);
        config.save(path)
    }

    pub fn store_api_key(&mut self, path: &Path, key: &str) -> Result<()> {
        self.ai.set_api_key(Some(key.to_string()));
        self.save(path)
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "dev-helper", "dev-helper")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}
