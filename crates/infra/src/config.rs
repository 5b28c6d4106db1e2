//! Configuration loading and representation.
//!
//! Everything is read from environment variables once at startup. The
//! `from_lookup` constructors take the lookup as a closure so tests never have
//! to mutate the process environment.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Configuration error (missing or malformed environment variable).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_KEY: &str = "SUPABASE_KEY";
pub const SUPABASE_TIMEOUT_SECS: &str = "SUPABASE_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials and transport settings for the hosted database.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Project base URL (e.g. `https://xyz.supabase.co`).
    pub url: Url,
    /// Service access key, sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Per-request transport timeout. This is not a retry policy.
    pub timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: &str, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let url = Url::parse(url).map_err(|e| ConfigError::Invalid {
            key: SUPABASE_URL,
            reason: e.to_string(),
        })?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing(SUPABASE_KEY));
        }
        Ok(Self {
            url,
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = required(&lookup, SUPABASE_URL)?;
        let key = required(&lookup, SUPABASE_KEY)?;
        let timeout_secs = parse_or(&lookup, SUPABASE_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?;

        Ok(Self::new(&url, key)?.with_timeout(Duration::from_secs(timeout_secs)))
    }
}

// The key is a credential; keep it out of logs.
impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Read a required, non-blank variable.
pub fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}

/// Parse an optional variable, falling back to `default` when unset or blank.
pub fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        _ => Ok(default),
    }
}

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`).
pub fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_credentials_with_default_timeout() {
        let cfg = DatabaseConfig::from_lookup(lookup_from(&[
            (SUPABASE_URL, "https://demo.supabase.co"),
            (SUPABASE_KEY, "secret"),
        ]))
        .unwrap();

        assert_eq!(cfg.url.as_str(), "https://demo.supabase.co/");
        assert_eq!(cfg.api_key, "secret");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_key_is_reported_by_name() {
        let err = DatabaseConfig::from_lookup(lookup_from(&[(SUPABASE_URL, "https://demo.supabase.co")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(SUPABASE_KEY));
    }

    #[test]
    fn malformed_url_is_rejected() {
        let err = DatabaseConfig::from_lookup(lookup_from(&[
            (SUPABASE_URL, "not a url"),
            (SUPABASE_KEY, "secret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: SUPABASE_URL, .. }));
    }

    #[test]
    fn timeout_override_must_be_numeric() {
        let err = DatabaseConfig::from_lookup(lookup_from(&[
            (SUPABASE_URL, "https://demo.supabase.co"),
            (SUPABASE_KEY, "secret"),
            (SUPABASE_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: SUPABASE_TIMEOUT_SECS, .. }));
    }

    #[test]
    fn debug_output_redacts_key() {
        let cfg = DatabaseConfig::new("https://demo.supabase.co", "secret").unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn flags_accept_common_spellings() {
        let lookup = lookup_from(&[("A", "yes"), ("B", "0"), ("C", "maybe")]);
        assert!(parse_flag(&lookup, "A", false).unwrap());
        assert!(!parse_flag(&lookup, "B", true).unwrap());
        assert!(parse_flag(&lookup, "C", false).is_err());
        assert!(parse_flag(&lookup, "UNSET", true).unwrap());
    }
}
