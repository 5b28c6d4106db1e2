//! Typed access to the `users` table.
//!
//! Each method is exactly one adapter call. Rows are decoded into
//! [`User`] here so the HTTP layer never touches raw JSON.

use serde_json::Value;
use thiserror::Error;

use userbase_core::{User, UserDraft, UserId};

use crate::db::{to_row, DbClient, DbError, Row};

pub const USERS_TABLE: &str = "users";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),

    /// A row came back that doesn't look like a user.
    #[error("invalid user row: {0}")]
    InvalidRow(String),
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DbClient,
}

impl UserRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<User>, RepoError> {
        let rows = self.db.from(USERS_TABLE).select("*").execute().await?;
        tracing::debug!(count = rows.len(), "listed users");
        rows.into_iter().map(decode_user).collect()
    }

    /// Insert one user and return it as stored (with its assigned id).
    ///
    /// `None` only if the service reports success but sends no row back.
    pub async fn create(&self, draft: &UserDraft) -> Result<Option<User>, RepoError> {
        let rows = self
            .db
            .from(USERS_TABLE)
            .insert(vec![to_row(draft)?])
            .returning()
            .execute()
            .await?;
        first_user(rows)
    }

    /// Overwrite `name` and `email` of the user with `id`.
    ///
    /// Returns `None` when no row matched.
    pub async fn update(&self, id: &UserId, draft: &UserDraft) -> Result<Option<User>, RepoError> {
        let rows = self
            .db
            .from(USERS_TABLE)
            .update(to_row(draft)?)
            .eq("id", id)
            .returning()
            .execute()
            .await?;
        first_user(rows)
    }

    /// Delete the user with `id`, returning the removed row.
    ///
    /// Returns `None` when no row matched.
    pub async fn delete(&self, id: &UserId) -> Result<Option<User>, RepoError> {
        let rows = self
            .db
            .from(USERS_TABLE)
            .delete()
            .eq("id", id)
            .returning()
            .execute()
            .await?;
        first_user(rows)
    }
}

fn first_user(rows: Vec<Row>) -> Result<Option<User>, RepoError> {
    rows.into_iter().next().map(decode_user).transpose()
}

/// Decode a row, tolerating numeric ids (identity columns) and extra columns.
fn decode_user(mut row: Row) -> Result<User, RepoError> {
    if let Some(Value::Number(n)) = row.get("id") {
        let id = n.to_string();
        row.insert("id".to_string(), Value::String(id));
    }
    serde_json::from_value(Value::Object(row)).map_err(|e| RepoError::InvalidRow(e.to_string()))
}
