//! Database client adapter.
//!
//! A thin handle over a [`RowStore`]: callers build queries fluently with
//! `from(table)` and the store decides how to run them. Two stores ship here:
//! - [`PostgrestStore`]: the hosted database's REST interface
//! - [`InMemoryRowStore`]: process-local tables for tests/dev

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::DatabaseConfig;

pub mod error;
pub mod in_memory;
pub mod postgrest;
pub mod query;
pub mod store;

pub use error::DbError;
pub use in_memory::InMemoryRowStore;
pub use postgrest::PostgrestStore;
pub use query::{EqFilter, Operation, Query, TableQuery, ALL_COLUMNS};
pub use store::RowStore;

/// One row as exchanged with the database: a JSON object.
pub type Row = serde_json::Map<String, Value>;

/// Shared, cheaply cloneable database handle.
#[derive(Clone)]
pub struct DbClient {
    store: Arc<dyn RowStore>,
}

impl DbClient {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// Client for the hosted service described by `config`.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let store = PostgrestStore::new(config)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Client over fresh, empty in-memory tables.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRowStore::new()))
    }

    /// Start a query against `table`. Without further calls it selects `*`.
    pub fn from(&self, table: &str) -> TableQuery {
        TableQuery::new(self.store.clone(), table)
    }
}

impl core::fmt::Debug for DbClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DbClient").finish_non_exhaustive()
    }
}

/// Serialize a value into a row. Fails unless it serializes to a JSON object.
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, DbError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DbError::Decode(format!("expected a JSON object, got {other}"))),
        Err(e) => Err(DbError::Decode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn in_memory_client_round_trips_through_builder() {
        let db = DbClient::in_memory();
        let inserted = db
            .from("users")
            .insert(vec![to_row(&json!({"name": "Ana"})).unwrap()])
            .returning()
            .execute()
            .await
            .unwrap();
        assert_eq!(inserted.len(), 1);

        let all = db.from("users").execute().await.unwrap();
        assert_eq!(all, inserted);
    }

    #[test]
    fn to_row_rejects_non_objects() {
        assert!(to_row(&json!([1, 2])).is_err());
        assert!(to_row(&json!({"a": 1})).is_ok());
    }
}
