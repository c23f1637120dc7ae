use crate::{Database, DatabaseError, Result};
use async_trait::async_trait;
use content::{generate_content_hash, ContentNormalizer};
use dimension::{ContentKind, ContentRichEntity, DimensionAttributes, DimensionContent};
use sqlx::{Row, Sqlite, Transaction};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Persistence of content rich entities together with their dimension contents
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Write the entity and replace all of its stored dimension contents.
    ///
    /// Saving is a compare-and-swap on the entity version: the stored
    /// version must equal the loaded one. The entity's version is bumped on
    /// success.
    async fn save(&self, entity: &mut ContentRichEntity) -> Result<()>;

    async fn load(&self, resource_key: &str, id: &str) -> Result<Option<ContentRichEntity>>;

    /// Returns whether anything was removed
    async fn remove(&self, resource_key: &str, id: &str) -> Result<bool>;

    async fn list_ids(&self, resource_key: &str) -> Result<Vec<String>>;
}

/// SQLite backed content store
pub struct ContentStorage {
    db: Arc<Database>,
}

fn locale_column(attributes: &DimensionAttributes) -> &str {
    attributes.locale().unwrap_or("")
}

impl ContentStorage {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Stored content hash of one dimension content
    pub async fn content_hash(
        &self,
        resource_key: &str,
        id: &str,
        attributes: &DimensionAttributes,
    ) -> Result<Option<String>> {
        let hash: Option<String> = sqlx::query_scalar(
            "SELECT content_hash FROM dimension_contents
             WHERE resource_key = ? AND resource_id = ? AND locale = ? AND stage = ?",
        )
        .bind(resource_key)
        .bind(id)
        .bind(locale_column(attributes))
        .bind(attributes.stage.as_str())
        .fetch_optional(self.db.pool())
        .await?;
        Ok(hash)
    }

    async fn stored_version(
        tx: &mut Transaction<'_, Sqlite>,
        resource_key: &str,
        id: &str,
    ) -> Result<i64> {
        let version: Option<i64> = sqlx::query_scalar(
            "SELECT version FROM content_rich_entities WHERE resource_key = ? AND id = ?",
        )
        .bind(resource_key)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(version.unwrap_or(0))
    }

    async fn insert_dimension_content(
        tx: &mut Transaction<'_, Sqlite>,
        content: &DimensionContent,
    ) -> Result<()> {
        let resource = content.resource();
        let data = serde_json::to_string(content)?;
        let hash = generate_content_hash(&ContentNormalizer.normalize(content));

        sqlx::query(
            "INSERT INTO dimension_contents
             (resource_key, resource_id, locale, stage, data, content_hash)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(resource.resource_key())
        .bind(&resource.id)
        .bind(locale_column(content.attributes()))
        .bind(content.stage().as_str())
        .bind(data)
        .bind(hash)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for ContentStorage {
    async fn save(&self, entity: &mut ContentRichEntity) -> Result<()> {
        let resource_key = entity.resource_key().to_string();
        let id = entity.id().to_string();
        let expected = entity.version();
        let kind = serde_json::to_string(entity.kind())?;

        let mut tx = self.db.pool().begin().await?;

        let written = if expected == 0 {
            sqlx::query(
                "INSERT INTO content_rich_entities (resource_key, id, kind, version)
                 VALUES (?, ?, ?, 1)
                 ON CONFLICT (resource_key, id) DO NOTHING",
            )
            .bind(&resource_key)
            .bind(&id)
            .bind(&kind)
            .execute(&mut *tx)
            .await?
        } else {
            sqlx::query(
                "UPDATE content_rich_entities
                 SET kind = ?, version = version + 1, updated_at = CURRENT_TIMESTAMP
                 WHERE resource_key = ? AND id = ? AND version = ?",
            )
            .bind(&kind)
            .bind(&resource_key)
            .bind(&id)
            .bind(expected)
            .execute(&mut *tx)
            .await?
        };

        if written.rows_affected() == 0 {
            let actual = Self::stored_version(&mut tx, &resource_key, &id).await?;
            tx.rollback().await?;
            warn!(
                "Rejected stale write of {} '{}' (version {}, stored {})",
                resource_key, id, expected, actual
            );
            return Err(DatabaseError::Conflict {
                resource_key,
                id,
                expected,
                actual,
            });
        }

        sqlx::query("DELETE FROM dimension_contents WHERE resource_key = ? AND resource_id = ?")
            .bind(&resource_key)
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        for content in entity.dimension_contents() {
            Self::insert_dimension_content(&mut tx, content).await?;
        }

        tx.commit().await?;

        entity.set_version(expected + 1);
        info!(
            "Saved {} '{}' with {} dimension contents (version {})",
            resource_key,
            id,
            entity.dimension_contents().len(),
            entity.version()
        );
        Ok(())
    }

    async fn load(&self, resource_key: &str, id: &str) -> Result<Option<ContentRichEntity>> {
        let row = match sqlx::query(
            "SELECT kind, version FROM content_rich_entities WHERE resource_key = ? AND id = ?",
        )
        .bind(resource_key)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        {
            Some(row) => row,
            None => return Ok(None),
        };

        let kind: ContentKind = serde_json::from_str(row.try_get::<&str, _>("kind")?)?;
        let version: i64 = row.try_get("version")?;

        let rows = sqlx::query(
            "SELECT data FROM dimension_contents
             WHERE resource_key = ? AND resource_id = ?
             ORDER BY stage, locale",
        )
        .bind(resource_key)
        .bind(id)
        .fetch_all(self.db.pool())
        .await?;

        let mut contents = Vec::with_capacity(rows.len());
        for row in rows {
            let content: DimensionContent = serde_json::from_str(row.try_get::<&str, _>("data")?)?;
            contents.push(content);
        }

        debug!(
            "Loaded {} '{}' with {} dimension contents",
            resource_key,
            id,
            contents.len()
        );
        Ok(Some(ContentRichEntity::restore(kind, id, version, contents)?))
    }

    async fn remove(&self, resource_key: &str, id: &str) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM dimension_contents WHERE resource_key = ? AND resource_id = ?")
            .bind(resource_key)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result =
            sqlx::query("DELETE FROM content_rich_entities WHERE resource_key = ? AND id = ?")
                .bind(resource_key)
                .bind(id)
                .execute(&mut *tx)
                .await?;

        tx.commit().await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!("Removed {} '{}'", resource_key, id);
        }
        Ok(removed)
    }

    async fn list_ids(&self, resource_key: &str) -> Result<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM content_rich_entities WHERE resource_key = ? ORDER BY id",
        )
        .bind(resource_key)
        .fetch_all(self.db.pool())
        .await?;
        Ok(ids)
    }
}
