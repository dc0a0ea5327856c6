//! Client configuration.
//!
//! Values come from code, the environment (`REFEROO_BASE_URL`,
//! `REFEROO_ACCESS_TOKEN`, `REFEROO_TIMEOUT_SECS`) or a TOML file with the
//! same keys in lower case. A config is read-only once built.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::{ApiError, Result};

pub const ENV_BASE_URL: &str = "REFEROO_BASE_URL";
pub const ENV_ACCESS_TOKEN: &str = "REFEROO_ACCESS_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "REFEROO_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

fn timeout_from_secs<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

/// Connection settings for a Referoo account.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.example.com/v1`.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub access_token: String,
    /// Whole-request timeout applied by the transport. Never zero.
    #[serde(
        rename = "timeout_secs",
        default = "default_timeout",
        deserialize_with = "timeout_from_secs"
    )]
    timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            timeout: default_timeout(),
        }
    }

    /// Replace the request timeout. A zero timeout is rejected.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.timeout = timeout;
        self.validate()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ApiError::config(e.to_string()))?;
        config.validate()
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ApiError::config(format!("{key} is not set")))
        };
        let base_url = required(ENV_BASE_URL)?;
        let access_token = required(ENV_ACCESS_TOKEN)?;
        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                ApiError::config(format!("{ENV_TIMEOUT_SECS} must be a whole number, got {raw:?}"))
            })?,
            None => default_timeout(),
        };
        Self {
            base_url,
            access_token,
            timeout,
        }
        .validate()
    }

    fn validate(self) -> Result<Self> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ApiError::config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.access_token.trim().is_empty() {
            return Err(ApiError::config("access_token is empty"));
        }
        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout must be greater than zero"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_required_values_and_default_timeout() {
        let config = ClientConfig::from_lookup(env(&[
            (ENV_BASE_URL, "https://api.referoo.test/v1"),
            (ENV_ACCESS_TOKEN, "abc"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.referoo.test/v1");
        assert_eq!(config.access_token, "abc");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err = ClientConfig::from_lookup(env(&[(ENV_BASE_URL, "https://x.test")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(ref msg) if msg.contains(ENV_ACCESS_TOKEN)));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(env(&[
            (ENV_BASE_URL, "https://x.test"),
            (ENV_ACCESS_TOKEN, "abc"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = ClientConfig::from_toml(
            r#"
            base_url = "ftp://x.test"
            access_token = "abc"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn loads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url = \"https://api.referoo.test/v1\"\naccess_token = \"abc\"\ntimeout_secs = 5"
        )
        .unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(!format!("{config:?}").contains("abc"));
    }

    #[test]
    fn sub_second_timeout_is_kept() {
        let config = ClientConfig::new("https://api.referoo.test/v1", "abc")
            .with_timeout(Duration::from_millis(500))
            .unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::new("https://api.referoo.test/v1", "abc")
            .with_timeout(Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(ref msg) if msg.contains("timeout")));

        let err = ClientConfig::from_lookup(env(&[
            (ENV_BASE_URL, "https://x.test"),
            (ENV_ACCESS_TOKEN, "abc"),
            (ENV_TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));

        let err = ClientConfig::from_toml(
            r#"
            base_url = "https://x.test"
            access_token = "abc"
            timeout_secs = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
