//! HTTP server configuration.
//!
//! Host, port, CORS policy, and the backend selection, read from the
//! environment at startup.

use userbase_infra::config::{parse_flag, parse_or, ConfigError};

pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";
pub const CORS_ORIGINS: &str = "CORS_ORIGINS";
pub const CORS_ALLOW_CREDENTIALS: &str = "CORS_ALLOW_CREDENTIALS";
pub const USERS_STRICT_NOT_FOUND: &str = "USERS_STRICT_NOT_FOUND";
pub const USERS_BACKEND: &str = "USERS_BACKEND";

/// Which row store backs the users resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Backend {
    /// The hosted database (credentials from `SUPABASE_*`).
    #[default]
    Remote,
    /// Process-local tables; data is lost on exit.
    Memory,
}

impl core::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" | "supabase" => Ok(Self::Remote),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("unknown backend {other:?} (expected remote or memory)")),
        }
    }
}

/// Cross-origin allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`: any origin, never with credentials.
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub origins: CorsOrigins,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: CorsOrigins::List(default_cors_origins()),
            allow_credentials: true,
        }
    }
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8000".to_string(),
        "http://localhost:5173".to_string(), // Vite dev server
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,
    /// Port to bind to (default: 8000)
    pub port: u16,
    pub cors: CorsConfig,
    /// Answer 404 instead of `{"value": null}` when update/delete match no row.
    pub strict_not_found: bool,
    pub backend: Backend,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors: CorsConfig::default(),
            strict_not_found: false,
            backend: Backend::Remote,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup(HOST)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);
        let port = parse_or(&lookup, PORT, defaults.port)?;
        let strict_not_found = parse_flag(&lookup, USERS_STRICT_NOT_FOUND, false)?;
        let backend = parse_or(&lookup, USERS_BACKEND, Backend::Remote)?;

        let origins = match lookup(CORS_ORIGINS) {
            Some(raw) if !raw.trim().is_empty() => parse_origins(&raw),
            _ => defaults.cors.origins,
        };
        let wants_credentials = parse_flag(&lookup, CORS_ALLOW_CREDENTIALS, true)?;
        let allow_credentials = match origins {
            CorsOrigins::Any => {
                if wants_credentials && lookup(CORS_ALLOW_CREDENTIALS).is_some() {
                    tracing::warn!("CORS credentials cannot be combined with wildcard origins; disabling credentials");
                }
                false
            }
            CorsOrigins::List(_) => wants_credentials,
        };

        Ok(Self {
            host,
            port,
            cors: CorsConfig {
                origins,
                allow_credentials,
            },
            strict_not_found,
            backend,
        })
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Comma-separated list; a lone `*` anywhere means any origin.
fn parse_origins(raw: &str) -> CorsOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if origins.iter().any(|o| o == "*") {
        CorsOrigins::Any
    } else {
        CorsOrigins::List(origins)
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
    fn test_default_config() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr(), "0.0.0.0:8000");
        assert!(config.cors.allow_credentials);
    }

    #[test]
    fn port_and_backend_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (PORT, "9090"),
            (USERS_BACKEND, "memory"),
            (USERS_STRICT_NOT_FOUND, "true"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.backend, Backend::Memory);
        assert!(config.strict_not_found);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = ServerConfig::from_lookup(lookup_from(&[(PORT, "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: PORT, .. }));
    }

    #[test]
    fn wildcard_origin_disables_credentials() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (CORS_ORIGINS, "*"),
            (CORS_ALLOW_CREDENTIALS, "true"),
        ]))
        .unwrap();
        assert_eq!(config.cors.origins, CorsOrigins::Any);
        assert!(!config.cors.allow_credentials);
    }

    #[test]
    fn origin_list_is_trimmed() {
        let config = ServerConfig::from_lookup(lookup_from(&[(
            CORS_ORIGINS,
            " https://app.example.com/ , http://localhost:3000,,",
        )]))
        .unwrap();
        assert_eq!(
            config.cors.origins,
            CorsOrigins::List(vec![
                "https://app.example.com".to_string(),
                "http://localhost:3000".to_string(),
            ])
        );
    }
}
