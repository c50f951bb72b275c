//! SQLite-backed tier hit counters.
//!
//! The increment is a single `UPDATE … SET hits = hits + 1` statement, so
//! the read-modify-write happens inside SQLite and concurrent writers to
//! the same tier cannot lose updates.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

use super::traits::{HitOutcome, TierHitStore};

const BUSY_TIMEOUT_SECS: u64 = 5;
const MAX_CONNECTIONS: u32 = 5;

pub struct SqliteHitStore {
    pool: SqlitePool,
}

impl SqliteHitStore {
    /// Open (creating if necessary) the counter database and make sure a
    /// row exists for every given tier key. Seeding uses `INSERT OR
    /// IGNORE`, so existing counts survive restarts untouched.
    pub async fn open(db_path: &Path, tier_keys: &[&str]) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create store directory {}", parent.display()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .context("open tier hit database")?;

        let store = Self { pool };
        store.init_schema().await?;
        store.seed(tier_keys).await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tier_hits (
                 tier       TEXT PRIMARY KEY,
                 hits       INTEGER NOT NULL DEFAULT 0,
                 updated_at TEXT NOT NULL
             )",
        )
        .execute(&self.pool)
        .await
        .context("create tier_hits table")?;
        Ok(())
    }

    async fn seed(&self, tier_keys: &[&str]) -> Result<()> {
        for key in tier_keys {
            sqlx::query("INSERT OR IGNORE INTO tier_hits (tier, hits, updated_at) VALUES ($1, 0, $2)")
                .bind(key)
                .bind(Utc::now().to_rfc3339())
                .execute(&self.pool)
                .await
                .with_context(|| format!("seed tier `{key}`"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl TierHitStore for SqliteHitStore {
    async fn record_hit(&self, tier_key: &str) -> Result<HitOutcome> {
        let result =
            sqlx::query("UPDATE tier_hits SET hits = hits + 1, updated_at = $2 WHERE tier = $1")
                .bind(tier_key)
                .bind(Utc::now().to_rfc3339())
                .execute(&self.pool)
                .await
                .with_context(|| format!("increment tier `{tier_key}`"))?;

        if result.rows_affected() == 0 {
            Ok(HitOutcome::UnknownTier)
        } else {
            Ok(HitOutcome::Recorded)
        }
    }

    async fn hits(&self, tier_key: &str) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT hits FROM tier_hits WHERE tier = $1")
            .bind(tier_key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("read hits for tier `{tier_key}`"))?;

        Ok(row.map(|(hits,)| hits))
    }
}
