use anyhow::Result;
use log::info;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

/// DbConnection owns the SQLite pool and the donor schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url`
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database {}", url);
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// A private in-memory database, used by tests.
    ///
    /// The pool holds exactly one connection that never expires; an in-memory
    /// SQLite database disappears with its last connection.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // name_key is the lower-cased normalized name; together with the phone
        // number it is the store's authoritative duplicate check.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS donors (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                gender TEXT NOT NULL CHECK (gender IN ('male', 'female')),
                blood_type TEXT NOT NULL,
                phone_number TEXT NOT NULL,
                age INTEGER CHECK (age IS NULL OR (age >= 14 AND age <= 80)),
                address TEXT NOT NULL DEFAULT '',
                city TEXT NOT NULL DEFAULT '',
                is_first_time BOOLEAN NOT NULL DEFAULT FALSE,
                is_dikshit BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TEXT NOT NULL,
                UNIQUE (name_key, phone_number)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_donors_created_at
            ON donors(created_at);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_donors_phone_number
            ON donors(phone_number);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
