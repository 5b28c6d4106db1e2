use std::sync::Arc;

use super::{DbError, Query, Row};

/// Executes a built query against some row store.
///
/// This is the seam between the fluent builder and the actual backend: the
/// hosted service in production, an in-memory table set in tests/dev.
#[async_trait::async_trait]
pub trait RowStore: Send + Sync {
    async fn execute(&self, query: Query) -> Result<Vec<Row>, DbError>;
}

#[async_trait::async_trait]
impl<S> RowStore for Arc<S>
where
    S: RowStore + ?Sized,
{
    async fn execute(&self, query: Query) -> Result<Vec<Row>, DbError> {
        (**self).execute(query).await
    }
}
