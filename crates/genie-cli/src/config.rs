//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration for genie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL (defaults to the hosted DataGenie API)
    pub base_url: Option<String>,
    /// Whether to use TUI mode by default
    pub tui: Option<bool>,
    /// Color theme (dark, light)
    pub theme: Option<String>,
    /// Identity provider settings
    pub auth: AuthConfig,
}

/// Identity provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Auth endpoint, e.g. `https://<project>.supabase.co/auth/v1`
    pub url: Option<String>,
    /// Public (anon) API key sent as the `apikey` header
    pub api_key: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("genie")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("GENIE_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file, falling back to defaults on any problem
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                eprintln!("Warning: Failed to parse config file: {}", e);
                Self::default()
            }),
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            base_url: Some(genie_api::DEFAULT_BASE_URL.to_string()),
            tui: Some(true),
            theme: Some("dark".to_string()),
            auth: AuthConfig::default(),
        };

        default_config.save()?;
        Ok(path)
    }

    /// Backend base URL: CLI flag, then `GENIE_BASE_URL`, then config, then default
    pub fn resolve_base_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| std::env::var("GENIE_BASE_URL").ok())
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| genie_api::DEFAULT_BASE_URL.to_string())
    }

    /// Identity provider endpoint and key, when both are configured
    pub fn identity_provider(&self) -> Option<(String, String)> {
        match (&self.auth.url, &self.auth.api_key) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => {
                Some((url.clone(), key.clone()))
            }
            _ => None,
        }
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# genie configuration file
# Place at ~/.config/genie/config.toml (Linux/Mac) or %APPDATA%\genie\config.toml (Windows)

# Backend base URL
base_url = "https://datagenie-backend.vercel.app/api"

# Whether to use TUI mode by default (true by default)
# Set to false for simple stdin/stdout mode
tui = true

# Color theme (dark, light)
theme = "dark"

# Identity provider used by `genie --login` (optional)
# Without it, requests are sent anonymously unless GENIE_TOKEN is set.
[auth]
# url = "https://<project>.supabase.co/auth/v1"
# api_key = "<public anon key>"
"#
}
