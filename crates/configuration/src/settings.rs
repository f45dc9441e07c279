use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Prefix shared by every environment variable this crate reads
/// (`THREECOMMAS_API_KEY`, `THREECOMMAS_API_SECRET`, ...).
pub const ENV_PREFIX: &str = "THREECOMMAS";

/// The public REST root of the 3Commas API.
pub const DEFAULT_BASE_URL: &str = "https://api.3commas.io/public/api";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings exactly as read from the file and environment sources.
///
/// Every field is optional at this stage so that all missing values can be
/// reported together by [`RawSettings::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub account_id: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl RawSettings {
    /// Checks that all required values are present and well-formed and turns
    /// them into the strongly-typed [`Settings`].
    pub fn validate(self) -> Result<Settings, ConfigError> {
        let api_key = non_blank(self.api_key);
        let api_secret = non_blank(self.api_secret);
        let account_id = non_blank(self.account_id);

        let missing: Vec<String> = [
            ("API_KEY", api_key.is_none()),
            ("API_SECRET", api_secret.is_none()),
            ("ACCOUNT_ID", account_id.is_none()),
        ]
        .into_iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(name, _)| format!("{ENV_PREFIX}_{name}"))
        .collect();

        let (Some(api_key), Some(api_secret), Some(account_id)) = (api_key, api_secret, account_id)
        else {
            return Err(ConfigError::Missing(missing));
        };

        let account_id = account_id.parse::<u64>().map_err(|_| {
            ConfigError::ValidationError(format!(
                "{ENV_PREFIX}_ACCOUNT_ID must be a positive integer, got '{account_id}'"
            ))
        })?;
        if account_id == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{ENV_PREFIX}_ACCOUNT_ID must be a positive integer, got '0'"
            )));
        }

        let base_url = non_blank(self.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ConfigError::ValidationError(format!(
                "{ENV_PREFIX}_BASE_URL must be an http(s) URL, got '{base_url}'"
            )));
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{ENV_PREFIX}_TIMEOUT_SECS must be greater than zero"
            )));
        }

        Ok(Settings {
            credentials: Credentials {
                api_key,
                api_secret,
                account_id,
            },
            client: ClientSettings {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The root configuration structure for the application.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub client: ClientSettings,
}

/// API credentials for the exchange aggregator. Read-only once loaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    /// The exchange account smart trades are placed on.
    pub account_id: u64,
}

// The secret must never end up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"<redacted>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

const MASK_VISIBLE: usize = 4;

/// Keeps the first four characters of a credential and hides the rest.
/// Values shorter than twice that are hidden entirely.
pub fn mask(value: &str) -> String {
    if value.chars().count() < 2 * MASK_VISIBLE {
        return "****".to_string();
    }
    let visible: String = value.chars().take(MASK_VISIBLE).collect();
    format!("{visible}…")
}

/// Transport settings for the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// API root without a trailing slash, e.g. `https://api.3commas.io/public/api`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
