//! Infrastructure layer: database adapter, user repository, configuration.

pub mod config;
pub mod db;
pub mod users;

pub use config::{ConfigError, DatabaseConfig};
pub use db::{DbClient, DbError, Row};
pub use users::{RepoError, UserRepository};
