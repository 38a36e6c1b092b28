//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Backend used when the console runs against a loopback host
pub const LOCAL_API_URL: &str = "http://localhost:8000";

/// Backend used for every other host
pub const DEPLOYED_API_URL: &str = "https://kayan-admin.vercel.app";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Explicit base URL; skips host-based resolution when set
    #[serde(default)]
    pub base_url: Option<String>,

    /// Host name the console runs under
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_local_url")]
    pub local_url: String,

    #[serde(default = "default_deployed_url")]
    pub deployed_url: String,

    /// No timeout unless configured
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_local_url() -> String {
    LOCAL_API_URL.to_string()
}

fn default_deployed_url() -> String {
    DEPLOYED_API_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            host: default_host(),
            local_url: default_local_url(),
            deployed_url: default_deployed_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Base URL the client talks to, without a trailing slash
    pub fn resolve_base_url(&self) -> String {
        let url = match &self.base_url {
            Some(url) if !url.trim().is_empty() => url.as_str(),
            _ if is_loopback_host(&self.host) => self.local_url.as_str(),
            _ => self.deployed_url.as_str(),
        };
        url.trim_end_matches('/').to_string()
    }
}

/// Whether a host name refers to the local machine
pub fn is_loopback_host(host: &str) -> bool {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    host.contains("localhost") || host == "127.0.0.1" || host == "::1"
}

/// Session persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_token_file")]
    pub token_file: String,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_token_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("kayan-admin").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./kayan_admin_session.json".to_string())
}

fn default_storage_key() -> String {
    "admin_token".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
            storage_key: default_storage_key(),
        }
    }
}

/// Page editor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    /// Slug used when the page selector is empty
    #[serde(default = "default_slug")]
    pub default_slug: String,

    #[serde(default = "default_canvas_styles")]
    pub canvas_styles: Vec<String>,
}

fn default_slug() -> String {
    "home".to_string()
}

fn default_canvas_styles() -> Vec<String> {
    vec!["https://fonts.googleapis.com/css2?family=Cairo:wght@400;600;700&display=swap".to_string()]
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_slug: default_slug(),
            canvas_styles: default_canvas_styles(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("kayan-admin").join("config.toml")),
            Some(PathBuf::from("/etc/kayan-admin/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        let candidates: Vec<PathBuf> = config_paths.into_iter().flatten().collect();
        Self::load_first(&candidates).unwrap_or_else(|| {
            tracing::debug!("Using default config with environment overrides");
            Self::from_env()
        })
    }

    /// First existing file in `paths` that loads; broken files are logged and skipped
    pub fn load_first(paths: &[PathBuf]) -> Option<Self> {
        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    return Some(config);
                }
                Err(e) => {
                    tracing::warn!("Failed to load config from {:?}: {}", path, e);
                }
            }
        }
        None
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("KAYAN_ADMIN_API_URL") {
            self.api.base_url = Some(url);
        }
        if let Some(host) = lookup("KAYAN_ADMIN_HOST") {
            self.api.host = host;
        }
        if let Some(path) = lookup("KAYAN_ADMIN_TOKEN_FILE") {
            self.session.token_file = path;
        }
        if let Some(level) = lookup("KAYAN_ADMIN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("KAYAN_ADMIN_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Kayan Admin Configuration
#
# Environment variables override these settings:
# - KAYAN_ADMIN_API_URL
# - KAYAN_ADMIN_HOST
# - KAYAN_ADMIN_TOKEN_FILE
# - KAYAN_ADMIN_LOG_LEVEL
# - KAYAN_ADMIN_LOG_FORMAT

[api]
# Explicit backend URL (skips host-based selection)
# base_url = "http://localhost:8000"

# Host name the console runs under. Loopback hosts use local_url,
# anything else uses deployed_url.
host = "localhost"
local_url = "http://localhost:8000"
deployed_url = "https://kayan-admin.vercel.app"

# Request timeout in seconds (unset = no timeout)
# request_timeout_secs = 30

[session]
# File holding the persisted admin token
# token_file = "~/.local/share/kayan-admin/session.json"
storage_key = "admin_token"

[editor]
# Slug used when no page is selected
default_slug = "home"
canvas_styles = ["https://fonts.googleapis.com/css2?family=Cairo:wght@400;600;700&display=swap"]

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}
