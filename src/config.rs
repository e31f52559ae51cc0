use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use url::Url;

use crate::error::SweepError;
use crate::types::ItemKind;

const ENV_ENDPOINT: &str = "MEDIASWEEP_ENDPOINT";
const ENV_USERNAME: &str = "MEDIASWEEP_USERNAME";
const ENV_PASSWORD: &str = "MEDIASWEEP_PASSWORD";
const ENV_API_KEY: &str = "MEDIASWEEP_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What to do with items whose kind the sweeper does not understand.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKindPolicy {
    /// Abort the run with `UnsupportedKind`.
    #[default]
    Reject,
    /// Drop the item with a warning.
    Skip,
}

/// On-disk shape of `config.toml`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub retention_days: Option<i64>,
    #[serde(default)]
    pub include_kinds: Option<Vec<String>>,
    #[serde(default)]
    pub ignore_list_contains: Vec<String>,
    #[serde(default)]
    pub ignore_list_equals: Vec<String>,
    #[serde(default)]
    pub test_mode: Option<bool>,
    #[serde(default)]
    pub print_ignored: bool,
    #[serde(default)]
    pub unknown_kinds: UnknownKindPolicy,
}

#[derive(Deserialize, Clone, Default)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Password(String),
    ApiKey(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password(_) => f.write_str("Password(<redacted>)"),
            Credentials::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub endpoint: Url,
    pub username: String,
    pub credentials: Credentials,
    pub timeout: Duration,
}

/// Validated retention rules for one run. Ignore entries are stored lower-cased.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    pub retention_days: u32,
    pub include_kinds: BTreeSet<ItemKind>,
    pub ignore_contains: Vec<String>,
    pub ignore_equals: Vec<String>,
    pub dry_run: bool,
    pub print_ignored: bool,
    pub unknown_kinds: UnknownKindPolicy,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub policy: RetentionPolicy,
}

/// `<config dir>/config.toml` for the current platform.
pub fn default_config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "mediasweep", "mediasweep")
        .context("unable to determine config directory for default config path")?;
    Ok(proj.config_dir().join("config.toml"))
}

impl FileConfig {
    /// Read and parse a config file. `None` resolves the platform default path.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Overlay `MEDIASWEEP_*` variables from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|k| std::env::var(k).ok());
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty(ENV_ENDPOINT) { self.connection.endpoint = Some(v); }
        if let Some(v) = non_empty(ENV_USERNAME) { self.connection.username = Some(v); }
        if let Some(v) = non_empty(ENV_PASSWORD) { self.connection.password = Some(v); }
        if let Some(v) = non_empty(ENV_API_KEY) { self.connection.api_key = Some(v); }
    }

    pub fn validate(self) -> Result<Settings, SweepError> {
        let connection = self.connection.validate()?;

        let retention_days = match self.retention_days {
            Some(d) if d > 0 => u32::try_from(d)
                .map_err(|_| SweepError::Config(format!("retention_days {} is too large", d)))?,
            Some(d) => return Err(SweepError::Config(format!("retention_days must be > 0 (got {})", d))),
            None => return Err(SweepError::Config("retention_days is required".into())),
        };

        let include_kinds: BTreeSet<ItemKind> = match self.include_kinds {
            Some(names) => names
                .iter()
                .map(|n| n.parse::<ItemKind>())
                .collect::<Result<_, _>>()
                .map_err(SweepError::Config)?,
            None => [ItemKind::Movie, ItemKind::Episode].into_iter().collect(),
        };
        if include_kinds.is_empty() {
            return Err(SweepError::Config("include_kinds must name at least one kind".into()));
        }

        Ok(Settings {
            connection,
            policy: RetentionPolicy {
                retention_days,
                include_kinds,
                ignore_contains: normalize_ignore_list(self.ignore_list_contains),
                ignore_equals: normalize_ignore_list(self.ignore_list_equals),
                dry_run: self.test_mode.unwrap_or(true),
                print_ignored: self.print_ignored,
                unknown_kinds: self.unknown_kinds,
            },
        })
    }
}

impl ConnectionConfig {
    fn validate(self) -> Result<ConnectionSettings, SweepError> {
        let raw = self
            .endpoint
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| SweepError::Config("connection.endpoint is required".into()))?;
        let endpoint = Url::parse(raw.trim())
            .map_err(|e| SweepError::Config(format!("invalid endpoint `{}`: {}", raw, e)))?;
        match endpoint.scheme() {
            "http" | "https" => {}
            other => return Err(SweepError::Config(format!("endpoint scheme must be http or https (got {})", other))),
        }

        let username = self
            .username
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| SweepError::Config("connection.username is required".into()))?;

        let password = self.password.filter(|p| !p.is_empty());
        let api_key = self.api_key.filter(|k| !k.trim().is_empty());
        let credentials = match (password, api_key) {
            (Some(_), Some(key)) => {
                tracing::warn!("both password and api_key configured; using api_key");
                Credentials::ApiKey(key)
            }
            (None, Some(key)) => Credentials::ApiKey(key),
            (Some(pw), None) => Credentials::Password(pw),
            (None, None) => return Err(SweepError::Config("connection needs a password or an api_key".into())),
        };

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(SweepError::Config("connection.timeout_secs must be > 0".into()));
        }

        Ok(ConnectionSettings { endpoint, username, credentials, timeout: Duration::from_secs(timeout_secs) })
    }
}

// Empty entries would match every key as a substring.
fn normalize_ignore_list(list: Vec<String>) -> Vec<String> {
    list.into_iter().filter(|s| !s.is_empty()).map(|s| s.to_lowercase()).collect()
}
