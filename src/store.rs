use std::path::Path;

use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use thiserror::Error;

use crate::db;
use crate::id::RecordId;
use crate::record::Record;
use crate::schema::EntitySchema;
use crate::AppResult;

/// Failure of one of the local store's operations.
#[derive(Debug, Error)]
pub enum StorageFault {
    #[error("failed to create table {table}: {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to insert into {table}: {source}")]
    Insert {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to read {table}: {source}")]
    Select {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to clear {table}: {source}")]
    Delete {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StorageFault {
    pub fn operation(&self) -> &'static str {
        match self {
            StorageFault::Schema { .. } => "schema",
            StorageFault::Insert { .. } => "insert",
            StorageFault::Select { .. } => "select",
            StorageFault::Delete { .. } => "delete",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            StorageFault::Schema { table, .. }
            | StorageFault::Insert { table, .. }
            | StorageFault::Select { table, .. }
            | StorageFault::Delete { table, .. } => table,
        }
    }

    pub fn source_error(&self) -> &sqlx::Error {
        match self {
            StorageFault::Schema { source, .. }
            | StorageFault::Insert { source, .. }
            | StorageFault::Select { source, .. }
            | StorageFault::Delete { source, .. } => source,
        }
    }
}

/// Durable home of one screen's records.
///
/// Implementations give per-statement atomicity and nothing more; ordering of
/// `select_all` is whatever the backend returns.
#[async_trait]
pub trait LocalStore: Send + Sync {
    fn schema(&self) -> &EntitySchema;

    /// Creates the backing table if absent. Safe to call repeatedly.
    async fn ensure_schema(&self) -> Result<(), StorageFault>;

    async fn insert(&self, record: &Record) -> Result<(), StorageFault>;

    async fn select_all(&self) -> Result<Vec<Record>, StorageFault>;

    /// Removes every record, returning how many were deleted.
    async fn delete_all(&self) -> Result<u64, StorageFault>;

    async fn close(&self);
}

/// [`LocalStore`] over a SQLite pool owned by the store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    schema: EntitySchema,
}

impl SqliteStore {
    pub fn from_pool(pool: SqlitePool, schema: EntitySchema) -> Self {
        Self { pool, schema }
    }

    pub async fn open(db_path: &Path, schema: EntitySchema) -> AppResult<Self> {
        let pool = db::open_sqlite_pool(db_path).await.map_err(|err| {
            crate::AppError::from(err)
                .with_context("operation", "open")
                .with_context("table", schema.table)
        })?;
        Ok(Self::from_pool(pool, schema))
    }

    pub async fn open_in_memory(schema: EntitySchema) -> AppResult<Self> {
        let pool = db::open_memory_pool().await?;
        Ok(Self::from_pool(pool, schema))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn decode(&self, row: &SqliteRow) -> Result<Record, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let text = |column: &str| -> Result<String, sqlx::Error> {
            Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
        };
        Ok(Record {
            id: RecordId::from_millis(id),
            title: text("title")?,
            date: text("date")?,
            description: text("description")?,
            media_uri: text(self.schema.media_column)?,
        })
    }
}

#[async_trait]
impl LocalStore for SqliteStore {
    fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    async fn ensure_schema(&self) -> Result<(), StorageFault> {
        sqlx::query(&self.schema.create_table_sql())
            .execute(&self.pool)
            .await
            .map_err(|source| StorageFault::Schema {
                table: self.schema.table,
                source,
            })?;
        tracing::debug!(target: "keepsake", event = "table_ready", table = self.schema.table);
        Ok(())
    }

    async fn insert(&self, record: &Record) -> Result<(), StorageFault> {
        sqlx::query(&self.schema.insert_sql())
            .bind(record.id.as_millis())
            .bind(&record.title)
            .bind(&record.date)
            .bind(&record.description)
            .bind(&record.media_uri)
            .execute(&self.pool)
            .await
            .map_err(|source| StorageFault::Insert {
                table: self.schema.table,
                source,
            })?;
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<Record>, StorageFault> {
        let fault = |source: sqlx::Error| StorageFault::Select {
            table: self.schema.table,
            source,
        };
        let rows = sqlx::query(&self.schema.select_all_sql())
            .fetch_all(&self.pool)
            .await
            .map_err(fault)?;
        rows.iter()
            .map(|row| self.decode(row).map_err(fault))
            .collect()
    }

    async fn delete_all(&self) -> Result<u64, StorageFault> {
        let res = sqlx::query(&self.schema.delete_all_sql())
            .execute(&self.pool)
            .await
            .map_err(|source| StorageFault::Delete {
                table: self.schema.table,
                source,
            })?;
        Ok(res.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::debug!(target: "keepsake", event = "db_closed", table = self.schema.table);
    }
}
