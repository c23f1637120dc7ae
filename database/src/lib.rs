use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub mod error;
pub mod init;
pub mod storage;

pub use error::{DatabaseError, Result};

pub use init::{create_content_tables, initialize_database, DatabaseConfig};
pub use storage::{ContentStorage, ContentStore};

/// Database connection pool
#[derive(Debug)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open a database, creating the file and its directory when missing
    pub async fn new(database_path: &str) -> Result<Self> {
        info!("Connecting to database at: {}", database_path);

        let in_memory = database_path.contains(":memory:");
        let options = if database_path.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_path)?
        } else if database_path == ":memory:" {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            if let Some(parent) = Path::new(database_path).parent() {
                std::fs::create_dir_all(parent)?;
            }
            SqliteConnectOptions::new().filename(database_path)
        };

        // Every connection to an in-memory database opens a fresh, empty one,
        // so the pool keeps exactly one alive
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new()
        };
        let pool = pool_options
            .connect_with(options.create_if_missing(true))
            .await?;

        debug!("Database connection established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Check if a table exists
    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let query = r#"
            SELECT COUNT(*) as count
            FROM sqlite_master
            WHERE type='table' AND name=?
        "#;

        let result: (i32,) = sqlx::query_as(query)
            .bind(table_name)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 > 0)
    }

    /// Execute raw SQL (for table creation, etc.)
    pub async fn execute_raw(&self, sql: &str) -> Result<()> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_connection_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");

        let db = Database::new(db_path.to_str().unwrap()).await.unwrap();

        assert!(db.pool().acquire().await.is_ok());
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_table_exists() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::new(temp_dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();

        db.execute_raw("CREATE TABLE test_table (id INTEGER PRIMARY KEY)")
            .await
            .unwrap();

        assert!(db.table_exists("test_table").await.unwrap());
        assert!(!db.table_exists("non_existent_table").await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_tables_visible_across_queries() {
        let db = Database::new(":memory:").await.unwrap();
        db.execute_raw("CREATE TABLE test_table (id INTEGER PRIMARY KEY)")
            .await
            .unwrap();

        for _ in 0..4 {
            assert!(db.table_exists("test_table").await.unwrap());
        }
    }
}
