//! Configuration management for the Mixcloud uploader.
//!
//! Settings are read from environment variables. A `.env` file in the local
//! data directory is loaded first, so values can live there instead of the
//! shell profile:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! The typed settings are built from a lookup closure. `from_env` passes
//! `std::env::var`, tests pass a map.

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
pub const DEFAULT_AUTH_URL: &str = "https://www.mixcloud.com/oauth/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://www.mixcloud.com/oauth/access_token";
pub const DEFAULT_UPLOAD_URL: &str = "https://api.mixcloud.com/upload/";
pub const DEFAULT_TRACKLIST_BASE_URL: &str = "http://dublab.cat/shows";
pub const DEFAULT_METADATA_FILE: &str = "shows.csv";
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 1800;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is not a valid number: {value}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("failed to load environment file: {0}")]
    Env(String),
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file is looked up at:
/// - Linux: `~/.local/share/cloudcast/.env`
/// - macOS: `~/Library/Application Support/cloudcast/.env`
/// - Windows: `%LOCALAPPDATA%/cloudcast/.env`
///
/// The directory is created if missing. A missing `.env` file is fine, every
/// setting can come from the process environment instead.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::Env(e.to_string()))?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| ConfigError::Env(e.to_string()))
}

/// Returns the application's local data directory, e.g. `~/.local/share/cloudcast`.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("cloudcast");
    path
}

/// Credentials and endpoints for the authorization-code flow.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    /// Overrides the listener address derived from `redirect_uri`.
    pub callback_address: Option<String>,
    /// `None` waits for the browser forever.
    pub callback_timeout: Option<Duration>,
}

impl OAuthSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = number(
            &lookup,
            "OAUTH_CALLBACK_TIMEOUT_SECS",
            DEFAULT_CALLBACK_TIMEOUT_SECS,
        )?;

        Ok(Self {
            client_id: required(&lookup, "MIXCLOUD_CLIENT_ID")?,
            client_secret: required(&lookup, "MIXCLOUD_CLIENT_SECRET")?,
            redirect_uri: or_default(&lookup, "MIXCLOUD_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            auth_url: or_default(&lookup, "MIXCLOUD_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default(&lookup, "MIXCLOUD_TOKEN_URL", DEFAULT_TOKEN_URL),
            callback_address: optional(&lookup, "OAUTH_CALLBACK_ADDRESS"),
            callback_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        })
    }
}

/// Locations and endpoints used by the upload orchestrator.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub upload_url: String,
    pub token_file: PathBuf,
    pub metadata_file: PathBuf,
    pub images_dir: PathBuf,
    pub tracklist_base_url: String,
    pub http_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl UploadSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_timeout = number(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        // An explicitly empty LOG_FILE turns file logging off.
        let log_file = match lookup("LOG_FILE") {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(PathBuf::from(value.trim())),
            None => Some(data_dir().join("cloudcast.log")),
        };

        Ok(Self {
            upload_url: or_default(&lookup, "MIXCLOUD_UPLOAD_URL", DEFAULT_UPLOAD_URL),
            token_file: optional(&lookup, "TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("token.txt")),
            metadata_file: PathBuf::from(or_default(
                &lookup,
                "METADATA_FILE",
                DEFAULT_METADATA_FILE,
            )),
            images_dir: PathBuf::from(or_default(&lookup, "IMAGES_DIR", DEFAULT_IMAGES_DIR)),
            tracklist_base_url: or_default(
                &lookup,
                "TRACKLIST_BASE_URL",
                DEFAULT_TRACKLIST_BASE_URL,
            ),
            http_timeout: Duration::from_secs(http_timeout),
            log_file,
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).unwrap_or_else(|| default.to_string())
}

fn number<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn oauth_settings_require_credentials() {
        let err = OAuthSettings::from_lookup(lookup(&[("MIXCLOUD_CLIENT_ID", "id")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("MIXCLOUD_CLIENT_SECRET")));
    }

    #[test]
    fn oauth_settings_fall_back_to_defaults() {
        let settings = OAuthSettings::from_lookup(lookup(&[
            ("MIXCLOUD_CLIENT_ID", "id"),
            ("MIXCLOUD_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(settings.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(settings.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(settings.callback_address, None);
        assert_eq!(
            settings.callback_timeout,
            Some(Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS))
        );
    }

    #[test]
    fn zero_callback_timeout_disables_it() {
        let settings = OAuthSettings::from_lookup(lookup(&[
            ("MIXCLOUD_CLIENT_ID", "id"),
            ("MIXCLOUD_CLIENT_SECRET", "secret"),
            ("OAUTH_CALLBACK_TIMEOUT_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(settings.callback_timeout, None);
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let err = UploadSettings::from_lookup(lookup(&[("HTTP_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber { key: "HTTP_TIMEOUT_SECS", .. }
        ));
    }

    #[test]
    fn empty_log_file_disables_file_logging() {
        let settings = UploadSettings::from_lookup(lookup(&[("LOG_FILE", "")])).unwrap();
        assert_eq!(settings.log_file, None);

        let settings = UploadSettings::from_lookup(lookup(&[
            ("LOG_FILE", "/tmp/cloudcast.log"),
            ("METADATA_FILE", "catalog.csv"),
        ]))
        .unwrap();
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/cloudcast.log")));
        assert_eq!(settings.metadata_file, PathBuf::from("catalog.csv"));
        assert_eq!(settings.upload_url, DEFAULT_UPLOAD_URL);
    }
}
