//! Configuration loading for the secretariat client.
//!
//! Read from a TOML file named by `--config <path>` or `SECRETARIA_CONFIG`.
//! Only `api_base_url` is required; everything else has a default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secretaria_cache::CacheConfig;
use secretaria_core::ConfigError;

/// Env var naming the config file when `--config` is absent.
pub const CONFIG_PATH_ENV: &str = "SECRETARIA_CONFIG";

/// Env var overriding `session.token`.
pub const SESSION_TOKEN_ENV: &str = "SECRETARIA_SESSION_TOKEN";

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_TOKEN_COOKIE: &str = "nextauth.token";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub session: SessionSection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    #[serde(default = "default_list_ttl_secs")]
    pub teacher_ttl_secs: u64,
    #[serde(default = "default_list_ttl_secs")]
    pub course_ttl_secs: u64,
    #[serde(default = "default_profile_ttl_secs")]
    pub secretariat_ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            teacher_ttl_secs: default_list_ttl_secs(),
            course_ttl_secs: default_list_ttl_secs(),
            secretariat_ttl_secs: default_profile_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    /// Id of the signed-in user, when the caller already knows it.
    #[serde(default)]
    pub user_id: Option<String>,
    /// JSON file backing the persisted key/value store.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    /// Raw session token (JWT).
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_token_cookie")]
    pub token_cookie_name: String,
    /// Raw `Cookie` header to search for the token cookie.
    #[serde(default)]
    pub cookie_header: Option<String>,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            user_id: None,
            storage_path: default_storage_path(),
            token: None,
            token_cookie_name: default_token_cookie(),
            cookie_header: None,
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_list_ttl_secs() -> u64 {
    secretaria_cache::DEFAULT_LIST_TTL.as_secs()
}

fn default_profile_ttl_secs() -> u64 {
    secretaria_cache::DEFAULT_PROFILE_TTL.as_secs()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("secretaria-session.json")
}

fn default_token_cookie() -> String {
    DEFAULT_TOKEN_COOKIE.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Missing configuration file path (use --config or SECRETARIA_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

impl ClientConfig {
    /// Load from `--config` or `SECRETARIA_CONFIG`, apply env overrides, validate.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let path = config_path_from_args(std::env::args().skip(1)).or_else(config_path_from_env);
        let path = path.ok_or(ConfigLoadError::MissingConfigPath)?;
        let mut config = Self::from_path(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(contents)?)
    }

    /// Minimal config pointing at `api_base_url`, everything else defaulted.
    pub fn for_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            log_format: LogFormat::default(),
            cache: CacheSection::default(),
            session: SessionSection::default(),
        }
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(SESSION_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.session.token = Some(token);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "api_base_url".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        for (field, value) in [
            ("cache.teacher_ttl_secs", self.cache.teacher_ttl_secs),
            ("cache.course_ttl_secs", self.cache.course_ttl_secs),
            ("cache.secretariat_ttl_secs", self.cache.secretariat_ttl_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be > 0".to_string(),
                });
            }
        }
        if self.session.token_cookie_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "session.token_cookie_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.session.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "session.storage_path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            teacher_ttl: Duration::from_secs(self.cache.teacher_ttl_secs),
            course_ttl: Duration::from_secs(self.cache.course_ttl_secs),
            secretariat_ttl: Duration::from_secs(self.cache.secretariat_ttl_secs),
        }
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from)
}

/// Find the value following `--config` in an argument list.
pub fn config_path_from_args<I>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
