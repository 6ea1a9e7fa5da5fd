//! Configuration management for the GED client using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::Session;

/// Default API root of a local Django backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Errors raised while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API root, without trailing slash.
    pub api_url: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Where `download` writes files.
    pub download_dir: PathBuf,
    /// Default for the `use_kdrive` upload flag.
    pub use_kdrive: bool,
    pub session: Session,
}

impl Default for Settings {
    fn default() -> Self {
        // Falls back gracefully: Downloads dir -> Home dir -> Current dir
        let download_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: format!("ged-admin/{}", env!("CARGO_PKG_VERSION")),
            download_dir,
            use_kdrive: false,
            session: Session::anonymous(),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API root URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Download directory; relative paths resolve against the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_kdrive: Option<bool>,
    /// Session credentials and identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers `ged` config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("ged").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::parse(path, &contents)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_err("TOML", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| parse_err("YAML", e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_err("JSON", e.to_string())),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref url) = self.api_url {
            settings.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(ref dir) = self.download_dir {
            settings.download_dir = self.resolve_path(dir, base_dir);
        }
        if let Some(use_kdrive) = self.use_kdrive {
            settings.use_kdrive = use_kdrive;
        }
        if let Some(ref session) = self.session {
            settings.session = session.clone();
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Use CWD for relative paths instead of config file directory.
    pub use_cwd: bool,
    /// API URL from the command line; beats every other source.
    pub api_url: Option<String>,
}

/// Apply `GED_API_URL` and `GED_REQUEST_TIMEOUT`, then session env vars.
fn apply_env_overrides(settings: &mut Settings) {
    if let Some(url) = std::env::var("GED_API_URL").ok().filter(|s| !s.is_empty()) {
        tracing::debug!("Using GED_API_URL from environment: {}", url);
        settings.api_url = url.trim_end_matches('/').to_string();
    }

    if let Ok(raw) = std::env::var("GED_REQUEST_TIMEOUT") {
        match raw.trim().parse::<u64>() {
            Ok(timeout) => settings.request_timeout = timeout,
            Err(_) => tracing::warn!("Ignoring invalid GED_REQUEST_TIMEOUT: {}", raw),
        }
    }

    settings.session = std::mem::take(&mut settings.session).with_env_overrides();
}

/// Load settings with explicit options.
/// Precedence: defaults < config file < environment < command line.
pub async fn load_settings_with_options(options: LoadOptions) -> (Settings, Config) {
    let config = match options.config_path {
        Some(ref path) => match Config::load_from_path(path).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}", e);
                Config::default()
            }
        },
        None => Config::load().await,
    };

    let mut settings = Settings::default();

    let base_dir = if options.use_cwd {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    } else {
        config
            .base_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    };

    config.apply_to_settings(&mut settings, &base_dir);
    apply_env_overrides(&mut settings);

    if let Some(url) = options.api_url.filter(|s| !s.is_empty()) {
        settings.api_url = url.trim_end_matches('/').to_string();
    }

    (settings, config)
}
