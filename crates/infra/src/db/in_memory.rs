use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;
use userbase_core::UserId;

use super::{DbError, Operation, Query, Row, RowStore, ALL_COLUMNS};

/// Postgres error code for unique-constraint violations, mirrored so callers
/// see the same error shape from both stores.
const UNIQUE_VIOLATION: &str = "23505";

/// In-memory row store.
///
/// Intended for tests/dev. Tables appear on first use. Inserted rows without
/// an `id` get one assigned, and `id` is treated as the primary key.
#[derive(Debug, Default)]
pub struct InMemoryRowStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl InMemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a table's rows in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.get(table).cloned().unwrap_or_default()
    }

    fn run(&self, query: Query) -> Result<Vec<Row>, DbError> {
        let columns = query.columns.clone();
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let table = tables.entry(query.table.clone()).or_default();

        let affected = match &query.operation {
            Operation::Select => table
                .iter()
                .filter(|row| query.matches(row))
                .cloned()
                .collect::<Vec<_>>(),
            Operation::Insert(rows) => insert(table, rows.clone())?,
            Operation::Update(patch) => {
                let mut updated = Vec::new();
                for row in table.iter_mut().filter(|row| query.matches(row)) {
                    for (k, v) in patch {
                        row.insert(k.clone(), v.clone());
                    }
                    updated.push(row.clone());
                }
                updated
            }
            Operation::Delete => {
                let (deleted, kept): (Vec<Row>, Vec<Row>) =
                    table.drain(..).partition(|row| query.matches(row));
                *table = kept;
                deleted
            }
        };

        Ok(match columns {
            Some(columns) => affected.iter().map(|row| project(row, &columns)).collect(),
            None => Vec::new(),
        })
    }
}

#[async_trait::async_trait]
impl RowStore for InMemoryRowStore {
    async fn execute(&self, query: Query) -> Result<Vec<Row>, DbError> {
        tracing::debug!(table = %query.table, op = query.operation.name(), "in-memory query");
        self.run(query)
    }
}

/// All-or-nothing insert: a duplicate id anywhere in the batch rejects it.
fn insert(table: &mut Vec<Row>, rows: Vec<Row>) -> Result<Vec<Row>, DbError> {
    let mut batch = Vec::with_capacity(rows.len());
    for mut row in rows {
        let missing_id = matches!(row.get("id"), None | Some(Value::Null));
        if missing_id {
            row.insert("id".to_string(), Value::String(UserId::generate().into_inner()));
        }
        let id = row.get("id").cloned();
        let clashes = table
            .iter()
            .chain(batch.iter())
            .any(|existing: &Row| existing.get("id") == id.as_ref());
        if clashes {
            return Err(DbError::remote(
                409,
                Some(UNIQUE_VIOLATION.to_string()),
                "duplicate key value violates unique constraint",
            ));
        }
        batch.push(row);
    }
    table.extend(batch.iter().cloned());
    Ok(batch)
}

fn project(row: &Row, columns: &str) -> Row {
    if columns.trim() == ALL_COLUMNS {
        return row.clone();
    }
    columns
        .split(',')
        .map(str::trim)
        .filter_map(|c| row.get(c).map(|v| (c.to_string(), v.clone())))
        .collect()
}
