use async_trait::async_trait;
use chrono::DateTime;
use migrato_core::HistorySnapshot;
use sqlx::{Database, Pool};
use tracing::warn;

use crate::{
    error::{Result, StoreError},
    history::History,
};

/// Default name of the history table.
pub const DEFAULT_TABLE: &str = "migration";

#[cfg(feature = "sqlite")]
pub type SqliteHistory = SqlHistory<sqlx::Sqlite>;

#[cfg(feature = "postgres")]
pub type PgHistory = SqlHistory<sqlx::Postgres>;

/// History read from a `migration(version, apply_time)` table, `apply_time`
/// being unix seconds. Rows without a usable apply time are skipped.
///
/// ```rust,ignore
/// let pool = SqlitePoolOptions::new().connect("sqlite://app.db").await?;
/// let history = SqliteHistory::from(pool).table("tbl_migration");
/// ```
pub struct SqlHistory<DB: Database> {
    pool: Pool<DB>,
    table: String,
}

impl<DB: Database> SqlHistory<DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self {
            pool,
            table: DEFAULT_TABLE.to_owned(),
        }
    }

    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = name.into();
        self
    }

    fn select_statement(&self) -> String {
        format!(
            r#"SELECT version, CAST(apply_time AS BIGINT) FROM "{}""#,
            self.table.replace('"', "\"\"")
        )
    }
}

impl<DB: Database> Clone for SqlHistory<DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table.to_owned(),
        }
    }
}

impl<DB: Database> From<Pool<DB>> for SqlHistory<DB> {
    fn from(pool: Pool<DB>) -> Self {
        Self::new(pool)
    }
}

fn to_snapshot(rows: Vec<(String, Option<i64>)>) -> HistorySnapshot {
    let mut snapshot = HistorySnapshot::new();

    for (name, apply_time) in rows {
        let Some(apply_time) = apply_time else {
            warn!("{}", StoreError::MissingApplyTime(name));
            continue;
        };

        match DateTime::from_timestamp(apply_time, 0) {
            Some(at) => snapshot.insert(name, at),
            None => warn!("{}", StoreError::InvalidApplyTime(name, apply_time)),
        }
    }

    snapshot
}

#[cfg(feature = "sqlite")]
#[async_trait]
impl History for SqlHistory<sqlx::Sqlite> {
    async fn snapshot(&self) -> Result<Option<HistorySnapshot>> {
        let tables = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(self.table.as_str())
        .fetch_one(&self.pool)
        .await?;

        if tables == 0 {
            return Ok(None);
        }

        let statement = self.select_statement();
        let rows = sqlx::query_as::<_, (String, Option<i64>)>(&statement)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(to_snapshot(rows)))
    }
}

#[cfg(feature = "postgres")]
#[async_trait]
impl History for SqlHistory<sqlx::Postgres> {
    async fn snapshot(&self) -> Result<Option<HistorySnapshot>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(self.table.as_str())
        .fetch_one(&self.pool)
        .await?;

        if !exists {
            return Ok(None);
        }

        let statement = self.select_statement();
        let rows = sqlx::query_as::<_, (String, Option<i64>)>(&statement)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(to_snapshot(rows)))
    }
}
