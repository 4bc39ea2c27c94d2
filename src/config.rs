//! Application configuration.
//!
//! Configuration is stored in `config.yaml` under the platform config
//! directory (or at `$PASTELERIA_CONFIG`) and includes:
//! - Backend project URL and optional schema
//! - API key and bearer token
//! - HTTP timeouts and retry budget
//! - List page size and auto-refresh interval

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PasteleriaError, Result};

pub const CONFIG_ENV: &str = "PASTELERIA_CONFIG";
pub const URL_ENV: &str = "SUPABASE_URL";
pub const API_KEY_ENV: &str = "SUPABASE_ANON_KEY";
pub const BEARER_ENV: &str = "SUPABASE_BEARER_TOKEN";

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "backend.url",
    "backend.schema",
    "auth.api_key",
    "auth.bearer_token",
    "http.connect_timeout",
    "http.request_timeout",
    "http.max_retries",
    "list.page_size",
    "list.auto_refresh",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Non-default schema sent as `Accept-Profile` / `Content-Profile`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Defaults to the API key when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("AuthConfig")
            .field("api_key", &redact(&self.api_key))
            .field("bearer_token", &redact(&self.bearer_token))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Extra attempts for failed reads
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    20
}

fn default_max_retries() -> u32 {
    3
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Seconds between refreshes in watch mode
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: u64,
}

fn default_page_size() -> u32 {
    20
}

fn default_auto_refresh() -> u64 {
    10
}

impl Default for ListConfig {
    fn default() -> Self {
        ListConfig {
            page_size: default_page_size(),
            auto_refresh: default_auto_refresh(),
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        PasteleriaError::Config(format!(
            "invalid value '{value}' for {key}. Expected a non-negative integer"
        ))
    })
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr + Default + PartialEq,
{
    let number: T = parse_number(key, value)?;
    if number == T::default() {
        return Err(PasteleriaError::Config(format!(
            "{key} must be greater than zero"
        )));
    }
    Ok(number)
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        if let Some(path) = env_value(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        match ProjectDirs::from("pe", "pasteleria", "pasteleria") {
            Some(dirs) => dirs.config_dir().join("config.yaml"),
            None => PathBuf::from(".pasteleria").join("config.yaml"),
        }
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            PasteleriaError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;

        // Owner read/write only, the file holds credentials
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Project URL from the environment or the config file
    pub fn backend_url(&self) -> Option<String> {
        env_value(URL_ENV).or_else(|| self.backend.url.clone())
    }

    /// API key from the environment or the config file
    pub fn api_key(&self) -> Option<String> {
        env_value(API_KEY_ENV).or_else(|| self.auth.api_key.clone())
    }

    /// Bearer token, falling back to the API key
    pub fn bearer_token(&self) -> Option<String> {
        env_value(BEARER_ENV)
            .or_else(|| self.auth.bearer_token.clone())
            .or_else(|| self.api_key())
    }

    /// Base URL of the REST endpoint (`<project>/rest/v1`)
    pub fn rest_url(&self) -> Result<Url> {
        let raw = self.backend_url().ok_or_else(|| {
            PasteleriaError::Config(format!(
                "backend.url is not set. Run `pasteleria config set backend.url <url>` or export {URL_ENV}"
            ))
        })?;
        let trimmed = raw.trim().trim_end_matches('/');
        let base = if trimmed.ends_with("/rest/v1") {
            trimmed.to_string()
        } else {
            format!("{trimmed}/rest/v1")
        };
        let url = Url::parse(&base)
            .map_err(|e| PasteleriaError::Config(format!("invalid backend.url '{raw}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PasteleriaError::Config(format!(
                "backend.url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http.connect_timeout)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout)
    }

    pub fn auto_refresh(&self) -> Duration {
        Duration::from_secs(self.list.auto_refresh.max(1))
    }

    /// Read a value by dot-notation key. Secrets are returned as stored.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "backend.url" => self.backend.url.clone(),
            "backend.schema" => self.backend.schema.clone(),
            "auth.api_key" => self.auth.api_key.clone(),
            "auth.bearer_token" => self.auth.bearer_token.clone(),
            "http.connect_timeout" => Some(self.http.connect_timeout.to_string()),
            "http.request_timeout" => Some(self.http.request_timeout.to_string()),
            "http.max_retries" => Some(self.http.max_retries.to_string()),
            "list.page_size" => Some(self.list.page_size.to_string()),
            "list.auto_refresh" => Some(self.list.auto_refresh.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a value by dot-notation key, validating it first.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let text = value.trim().to_string();
        match key {
            "backend.url" => {
                Url::parse(text.trim_end_matches('/')).map_err(|e| {
                    PasteleriaError::Config(format!("invalid backend.url '{text}': {e}"))
                })?;
                self.backend.url = Some(text);
            }
            "backend.schema" => {
                self.backend.schema = (!text.is_empty()).then_some(text);
            }
            "auth.api_key" => self.auth.api_key = Some(text),
            "auth.bearer_token" => self.auth.bearer_token = Some(text),
            "http.connect_timeout" => self.http.connect_timeout = parse_positive(key, &text)?,
            "http.request_timeout" => self.http.request_timeout = parse_positive(key, &text)?,
            "http.max_retries" => self.http.max_retries = parse_number(key, &text)?,
            "list.page_size" => self.list.page_size = parse_positive(key, &text)?,
            "list.auto_refresh" => self.list.auto_refresh = parse_number(key, &text)?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> PasteleriaError {
    PasteleriaError::Config(format!(
        "unknown config key '{}'. Valid keys: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

/// Whether a key holds a credential that should be masked on display
pub fn is_secret_key(key: &str) -> bool {
    key.starts_with("auth.")
}
