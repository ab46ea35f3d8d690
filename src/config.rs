//! Configuration management for fd2ppv using the prefer crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scrapers::http_client::HttpClientOptions;

/// Site origin used for canonical article URLs and relative avatar paths.
pub const DEFAULT_BASE_URL: &str = "https://fd2ppv.cc";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Fields rule that attributes titles to the seller instead of the cast.
pub const FIELD_RULE_SELLER_AS_ACTOR: &str = "fc2_seller";

/// Read-only view of the settings a scraper consumes.
pub trait ConfigProvider: Send + Sync {
    /// Raw session cookie string, if configured.
    fn cookie(&self) -> Option<&str>;

    /// Whether a fields rule flag is enabled.
    fn has_field_rule(&self, rule: &str) -> bool;

    /// Site origin without a trailing slash.
    fn base_url(&self) -> &str {
        DEFAULT_BASE_URL
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    /// Session cookie copied from a logged-in browser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
    /// Field attribution flags (e.g. `fc2_seller`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[prefer(default)]
    pub fields_rule: Vec<String>,
    /// User agent: unset for the crate agent, `impersonate`, or a custom string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Proxy URL (http, https or socks5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Site origin override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer for file discovery.
    /// Falls back to defaults with env overrides when nothing is found.
    pub async fn load() -> Self {
        match prefer::load("fd2ppv").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("{}", e);
                        Self::default_with_env()
                    }
                },
                None => Self::default_with_env(),
            },
            Err(_) => Self::default_with_env(),
        }
    }

    /// Defaults with environment overrides applied.
    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// TOML and YAML by extension, JSON otherwise.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    /// Parse config text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// Apply `FD2PPV_COOKIE`, `FD2PPV_FIELDS_RULE` and `FD2PPV_PROXY`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(cookie) = var("FD2PPV_COOKIE") {
            self.cookie = Some(cookie);
        }
        if let Some(rules) = var("FD2PPV_FIELDS_RULE") {
            self.fields_rule = rules
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
        }
        if let Some(proxy) = var("FD2PPV_PROXY") {
            self.proxy = Some(proxy);
        }
        self
    }

    /// HTTP client options derived from this config.
    pub fn http_options(&self) -> HttpClientOptions {
        HttpClientOptions {
            timeout: Duration::from_secs(self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)),
            user_agent: self.user_agent.clone(),
            proxy: self.proxy.clone(),
        }
    }

    /// Copy with the cookie value hidden, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(ref cookie) = config.cookie {
            let count = crate::scrapers::CookieMap::parse(cookie).len();
            config.cookie = Some(format!("<{} cookies hidden>", count));
        }
        config
    }
}

impl ConfigProvider for Config {
    fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref().filter(|c| !c.trim().is_empty())
    }

    fn has_field_rule(&self, rule: &str) -> bool {
        self.fields_rule.iter().any(|r| r == rule)
    }

    fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }
}

/// Options for loading configuration.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Load configuration from `--config` if given, otherwise by discovery.
pub async fn load_config_with_options(options: &LoadOptions) -> Result<Config, ConfigError> {
    match options.config_path {
        Some(ref path) => Config::load_from_path(path).await,
        None => Ok(Config::load().await),
    }
}
