//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local use.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const CREDENTIALS_DIR: &str = ".wardrobe";
const CREDENTIALS_FILE_NAME: &str = "credentials.json";
const DEFAULT_KEYRING_SERVICE: &str = "wardrobe-cli";
const DEFAULT_USER_ID_CLAIM: &str = "sub";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the wardrobe backend, without a trailing slash
    pub api_base_url: String,
    /// Upper bound on a token refresh, and on how long queued requests wait for it
    pub refresh_timeout: Duration,
    /// Per-request timeout (image analysis can be slow)
    pub request_timeout: Duration,
    /// Fallback credentials file, used when the OS keychain is unavailable
    pub credentials_path: PathBuf,
    /// Keychain service name the credentials are stored under
    pub keyring_service: String,
    /// Access-token claim holding the numeric user id
    pub user_id_claim: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".to_string(),
            refresh_timeout: Duration::from_secs(DEFAULT_REFRESH_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            credentials_path: default_credentials_path()
                .unwrap_or_else(|| PathBuf::from(CREDENTIALS_DIR).join(CREDENTIALS_FILE_NAME)),
            keyring_service: DEFAULT_KEYRING_SERVICE.to_string(),
            user_id_claim: DEFAULT_USER_ID_CLAIM.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("WARDROBE_API_URL")
            .map_err(|_| ConfigError::Missing("WARDROBE_API_URL"))?
            .trim()
            .trim_end_matches('/')
            .to_string();
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid("WARDROBE_API_URL", api_base_url));
        }

        let credentials_path = match env::var("WARDROBE_CREDENTIALS_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_credentials_path()
                .ok_or(ConfigError::Missing("WARDROBE_CREDENTIALS_PATH"))?,
        };

        Ok(Self {
            api_base_url,
            refresh_timeout: Duration::from_secs(secs_var(
                "WARDROBE_REFRESH_TIMEOUT_SECS",
                DEFAULT_REFRESH_TIMEOUT_SECS,
            )?),
            request_timeout: Duration::from_secs(secs_var(
                "WARDROBE_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            credentials_path,
            keyring_service: env::var("WARDROBE_KEYRING_SERVICE")
                .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string()),
            user_id_claim: env::var("WARDROBE_USER_ID_CLAIM")
                .unwrap_or_else(|_| DEFAULT_USER_ID_CLAIM.to_string()),
        })
    }
}

/// `~/.wardrobe/credentials.json`, or `None` when there is no home directory.
fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE_NAME))
}

fn secs_var(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(ConfigError::Invalid(name, raw)),
            Ok(secs) => Ok(secs),
        },
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
