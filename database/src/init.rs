use crate::{Database, DatabaseError, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Database initialization configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Whether to create the content tables on initialization
    #[serde(default = "default_create_tables")]
    pub create_tables: bool,
}

fn default_create_tables() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data").join("content.db"),
            create_tables: true,
        }
    }
}

impl DatabaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_path(database_path: PathBuf) -> Self {
        Self {
            database_path,
            create_tables: true,
        }
    }

    /// Set a custom database path
    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database_path = path;
        self
    }

    /// Set whether to create tables on initialization
    pub fn with_create_tables(mut self, create: bool) -> Self {
        self.create_tables = create;
        self
    }
}

/// Open the database and create the content tables if requested
pub async fn initialize_database(config: DatabaseConfig) -> Result<Arc<Database>> {
    let db_path_str = config
        .database_path
        .to_str()
        .ok_or_else(|| DatabaseError::InvalidPath(config.database_path.clone()))?;

    let db = Arc::new(Database::new(db_path_str).await?);

    if config.create_tables {
        create_content_tables(&db).await?;
    }

    Ok(db)
}

/// Create the entity and dimension content tables.
///
/// Unlocalized dimension contents are stored with an empty locale so the
/// primary key stays free of NULLs.
pub async fn create_content_tables(db: &Database) -> Result<()> {
    db.execute_raw(
        r#"
        CREATE TABLE IF NOT EXISTS content_rich_entities (
            resource_key TEXT NOT NULL,
            id TEXT NOT NULL,
            kind TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (resource_key, id)
        )
        "#,
    )
    .await?;

    db.execute_raw(
        r#"
        CREATE TABLE IF NOT EXISTS dimension_contents (
            resource_key TEXT NOT NULL,
            resource_id TEXT NOT NULL,
            locale TEXT NOT NULL DEFAULT '',
            stage TEXT NOT NULL,
            data TEXT NOT NULL,
            content_hash TEXT NOT NULL,
            PRIMARY KEY (resource_key, resource_id, locale, stage),
            FOREIGN KEY (resource_key, resource_id)
                REFERENCES content_rich_entities (resource_key, id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    info!("Content tables ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let db = initialize_database(DatabaseConfig::new_with_path(db_path.clone()))
            .await
            .unwrap();

        assert!(db_path.exists());
        assert!(db.table_exists("content_rich_entities").await.unwrap());
        assert!(db.table_exists("dimension_contents").await.unwrap());

        // idempotent
        create_content_tables(&db).await.unwrap();
    }

    #[tokio::test]
    async fn test_initialization_without_tables() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig::new()
            .with_database_path(temp_dir.path().join("test.db"))
            .with_create_tables(false);

        let db = initialize_database(config).await.unwrap();

        assert!(!db.table_exists("dimension_contents").await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_path_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from(OsStr::from_bytes(b"/tmp/content-\xff.db"));
        let result = initialize_database(DatabaseConfig::new_with_path(path)).await;

        assert!(matches!(result, Err(DatabaseError::InvalidPath(_))));
    }

    #[test]
    fn test_config_from_yaml() {
        let config: DatabaseConfig =
            serde_yaml::from_str("database_path: /tmp/content.db").unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/content.db"));
        assert!(config.create_tables);
    }
}
