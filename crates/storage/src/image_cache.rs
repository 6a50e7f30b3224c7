//! Image cache backed by SQLite.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use depth_common::{DepthError, DepthResult};

/// Cache key for the resized image at `width` columns.
pub fn resized_description(width: usize) -> String {
    format!("resized_{}", width)
}

/// One stored image.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CachedImage {
    pub description: String,
    pub image_blob: Vec<u8>,
}

/// Connection pool plus the `stored_image` operations.
///
/// At most one row exists per description; the first writer wins and
/// later [`populate`](ImageCache::populate) calls are no-ops.
#[derive(Clone)]
pub struct ImageCache {
    pool: SqlitePool,
}

impl ImageCache {
    /// Open (creating if needed) the database at `database_url`,
    /// e.g. `sqlite://depth_image.db`.
    pub async fn connect(database_url: &str) -> DepthResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| DepthError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DepthError::Database(format!("Connection failed: {}", e)))?;

        info!(database_url = %database_url, "Connected to image cache");
        Ok(Self { pool })
    }

    /// Create the schema if absent. Safe to call on every start.
    pub async fn migrate(&self) -> DepthResult<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| DepthError::Database(format!("Migration failed: {}", e)))?;
            }
        }
        Ok(())
    }

    /// Fetch the image stored under `description`.
    pub async fn lookup(&self, description: &str) -> DepthResult<Option<CachedImage>> {
        sqlx::query_as::<_, CachedImage>(
            "SELECT description, image_blob FROM stored_image WHERE description = ?1",
        )
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DepthError::Database(format!("Query failed: {}", e)))
    }

    /// Store `image_blob` under `description` unless a row already exists.
    ///
    /// Returns `true` when this call inserted the row.
    pub async fn populate(&self, description: &str, image_blob: &[u8]) -> DepthResult<bool> {
        let result = sqlx::query(
            "INSERT INTO stored_image (description, image_blob) VALUES (?1, ?2) \
             ON CONFLICT(description) DO NOTHING",
        )
        .bind(description)
        .bind(image_blob)
        .execute(&self.pool)
        .await
        .map_err(|e| DepthError::Database(format!("Insert failed: {}", e)))?;

        let inserted = result.rows_affected() > 0;
        debug!(description = %description, bytes = image_blob.len(), inserted, "Populate image cache");
        Ok(inserted)
    }

    /// Number of stored images.
    pub async fn count(&self) -> DepthResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stored_image")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DepthError::Database(format!("Query failed: {}", e)))
    }

    /// Close the pool, waiting for open connections to finish.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS stored_image (
    id INTEGER PRIMARY KEY,
    description TEXT NOT NULL UNIQUE,
    image_blob BLOB NOT NULL
);
"#;
