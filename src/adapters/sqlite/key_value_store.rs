use crate::config::AppConfig;
use crate::ports::key_value_store::{KeyValueStore as KeyValueStoreTrait, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

const UPSERT: &str = r#"
    INSERT INTO key_value_store (key, value, updated_at)
    VALUES (?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

/// Open the SQLite database described by the config and run migrations
///
/// A single connection is used: the ledger is the only writer on the device,
/// and `sqlite::memory:` databases are private to their connection.
pub async fn connect(config: &AppConfig) -> std::result::Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(config.create_if_missing);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!(database_url = %config.database_url, "key-value store ready");
    Ok(pool)
}

/// SQLite implementation of KeyValueStore
///
/// Values live in a single `key_value_store` table.
/// `set_many` writes every entry inside one transaction, so multi-key
/// updates are committed atomically.
pub struct KeyValueStore {
    pool: SqlitePool,
}

impl KeyValueStore {
    /// Create a new KeyValueStore with a SQLite connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect using the config and wrap the resulting pool
    pub async fn open(config: &AppConfig) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self::new(connect(config).await?))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStoreTrait for KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM key_value_store WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM key_value_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Write all entries in a single transaction
    ///
    /// If any statement fails the transaction is dropped without commit and
    /// rolled back, leaving every key unchanged.
    async fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for (key, value) in entries {
            sqlx::query(UPSERT)
                .bind(*key)
                .bind(value.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!(keys = entries.len(), "committed multi-key write");
        Ok(())
    }
}
