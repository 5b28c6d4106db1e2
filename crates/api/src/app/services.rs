use anyhow::Context;

use userbase_infra::{DatabaseConfig, DbClient, UserRepository};

use crate::config::{Backend, ServerConfig};

/// Everything handlers need, constructed once at startup and shared via an
/// `Extension`.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub users: UserRepository,
    /// Whether a missed update/delete is reported as 404 (see `ServerConfig`).
    pub strict_not_found: bool,
}

impl AppServices {
    pub fn new(db: DbClient, strict_not_found: bool) -> Self {
        Self {
            users: UserRepository::new(db),
            strict_not_found,
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(DbClient::in_memory(), false)
    }
}

/// Wire services for the configured backend.
///
/// The remote backend reads its credentials from `SUPABASE_URL` /
/// `SUPABASE_KEY`.
pub fn build_services(config: &ServerConfig) -> anyhow::Result<AppServices> {
    let db = match config.backend {
        Backend::Remote => {
            let db_config = DatabaseConfig::from_env().context("loading database configuration")?;
            tracing::info!(url = %db_config.url, "using hosted database");
            DbClient::connect(&db_config).context("building database client")?
        }
        Backend::Memory => {
            tracing::warn!("using in-memory users table; data is lost on exit");
            DbClient::in_memory()
        }
    };
    Ok(AppServices::new(db, config.strict_not_found))
}
