use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_WEATHER_BASE: &str = "/weather";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "http://127.0.0.1:8000"
/// cookies = "sessionid=abc; csrftoken=xyz"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin of the contacts application, without a trailing path.
    pub base_url: String,

    /// Raw cookie string for the session, in `document.cookie` form.
    pub cookies: Option<String>,

    /// Name of the cookie holding the CSRF token.
    pub csrf_cookie: String,

    pub api_base: String,
    pub weather_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cookies: None,
            csrf_cookie: DEFAULT_CSRF_COOKIE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            weather_base: DEFAULT_WEATHER_BASE.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "contacts", "contacts-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(anyhow!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }
        Ok(())
    }

    /// Replace the base url, rejecting values that are not http(s) origins.
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        let previous = std::mem::replace(&mut self.base_url, url.trim_end_matches('/').to_string());
        if let Err(err) = self.validate() {
            self.base_url = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn cookies(&self) -> &str {
        self.cookies.as_deref().unwrap_or_default()
    }
}
