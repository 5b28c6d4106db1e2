//! Fluent query building.
//!
//! `DbClient::from("users")` starts a [`TableQuery`]; chaining mutates the
//! underlying [`Query`] value and `execute()` hands it to the store:
//!
//! ```ignore
//! let rows = db
//!     .from("users")
//!     .update(patch)
//!     .eq("id", "0190...")
//!     .returning()
//!     .execute()
//!     .await?;
//! ```

use std::sync::Arc;

use serde_json::Value;

use super::{DbError, Row, RowStore};

/// Column list meaning "every column".
pub const ALL_COLUMNS: &str = "*";

/// What a query does to its table.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Select,
    Insert(Vec<Row>),
    Update(Row),
    Delete,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Select => "select",
            Operation::Insert(_) => "insert",
            Operation::Update(_) => "update",
            Operation::Delete => "delete",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Operation::Select)
    }
}

/// Equality predicate on one column.
///
/// Values are compared in their text form, the same way the hosted service
/// receives them in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqFilter {
    pub column: String,
    pub value: String,
}

impl EqFilter {
    /// Whether `row` satisfies this predicate.
    pub fn matches(&self, row: &Row) -> bool {
        match row.get(&self.column) {
            Some(Value::String(s)) => *s == self.value,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == self.value,
        }
    }
}

/// A fully described request against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub operation: Operation,
    /// Filters are ANDed together.
    pub filters: Vec<EqFilter>,
    /// Columns to return. Always set for selects; for mutations `None` means
    /// "don't send the affected rows back".
    pub columns: Option<String>,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            operation: Operation::Select,
            filters: Vec::new(),
            columns: Some(ALL_COLUMNS.to_string()),
        }
    }

    /// Whether affected/selected rows should come back to the caller.
    pub fn returns_rows(&self) -> bool {
        self.columns.is_some()
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

/// Builder bound to a store; consumed by `execute`.
pub struct TableQuery {
    store: Arc<dyn RowStore>,
    query: Query,
}

impl TableQuery {
    pub(crate) fn new(store: Arc<dyn RowStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            query: Query::new(table),
        }
    }

    /// Choose returned columns.
    ///
    /// On a plain read this is the projection. After `insert`/`update`/`delete`
    /// it asks for the affected rows back, restricted to `columns`.
    pub fn select(mut self, columns: &str) -> Self {
        self.query.columns = Some(columns.to_string());
        self
    }

    /// Shorthand for `select("*")` after a mutation.
    pub fn returning(self) -> Self {
        self.select(ALL_COLUMNS)
    }

    pub fn insert(mut self, rows: Vec<Row>) -> Self {
        self.query.operation = Operation::Insert(rows);
        self.query.columns = None;
        self
    }

    pub fn update(mut self, patch: Row) -> Self {
        self.query.operation = Operation::Update(patch);
        self.query.columns = None;
        self
    }

    pub fn delete(mut self) -> Self {
        self.query.operation = Operation::Delete;
        self.query.columns = None;
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.query.filters.push(EqFilter {
            column: column.into(),
            value: value.to_string(),
        });
        self
    }

    /// The query as built so far.
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub async fn execute(self) -> Result<Vec<Row>, DbError> {
        self.store.execute(self.query).await
    }
}
