//! Handing merged content to a search index

use crate::aggregator::ContentAggregator;
use crate::error::ContentError;
use crate::hashing::generate_content_hash;
use crate::normalizer::ContentNormalizer;
use crate::Result;
use dimension::{ContentRichEntity, DimensionAttributes, DimensionContent, Stage};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a search index receives for one merged dimension content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDocument {
    pub resource_key: String,
    pub id: String,
    pub locale: Option<String>,
    pub stage: Stage,
    /// SHA-256 over the content keys, stable across stages
    pub content_hash: String,
    pub data: Map<String, Value>,
}

/// Search index collaborator.
///
/// Whatever error an implementation returns reaches callers as
/// `ContentError::Index`.
pub trait SearchIndex: Send + Sync {
    fn index(&self, document: IndexDocument) -> Result<()>;

    fn deindex(&self, resource_key: &str, id: &str, attributes: &DimensionAttributes) -> Result<()>;
}

pub struct ContentIndexer {
    aggregator: Arc<ContentAggregator>,
    normalizer: ContentNormalizer,
    index: Arc<dyn SearchIndex>,
}

impl ContentIndexer {
    pub fn new(aggregator: Arc<ContentAggregator>, index: Arc<dyn SearchIndex>) -> Self {
        Self {
            aggregator,
            normalizer: ContentNormalizer,
            index,
        }
    }

    /// Index the merged content for the attributes.
    ///
    /// Content that only exists as a ghost fallback, or not at all, is
    /// removed from the index and reported as not found.
    pub fn index(
        &self,
        entity: &ContentRichEntity,
        attributes: &DimensionAttributes,
    ) -> Result<DimensionContent> {
        if entity.dimension_content(attributes).is_none() {
            self.deindex(entity.resource_key(), entity.id(), attributes)?;
            return Err(ContentError::ContentNotFound {
                resource_key: entity.resource_key().to_string(),
                id: entity.id().to_string(),
                attributes: attributes.clone(),
            });
        }

        let content = match self.aggregator.aggregate(entity, attributes) {
            Ok(content) => content,
            Err(error @ ContentError::ContentNotFound { .. }) => {
                self.deindex(entity.resource_key(), entity.id(), attributes)?;
                return Err(error);
            }
            Err(error) => return Err(error),
        };

        self.index_dimension_content(&content)?;
        Ok(content)
    }

    /// Index an already merged dimension content
    pub fn index_dimension_content(&self, content: &DimensionContent) -> Result<()> {
        let data = self.normalizer.normalize(content);
        let document = IndexDocument {
            resource_key: content.resource().resource_key().to_string(),
            id: content.resource().id.clone(),
            locale: content.locale().map(str::to_string),
            stage: content.stage(),
            content_hash: generate_content_hash(&data),
            data,
        };

        debug!(
            "Indexing {} {} ({:?}, {}) with hash {}",
            document.resource_key,
            document.id,
            document.locale,
            document.stage,
            document.content_hash
        );
        let (resource_key, id) = (document.resource_key.clone(), document.id.clone());
        self.index
            .index(document)
            .map_err(|error| index_failure("Indexing", &resource_key, &id, error))
    }

    /// Remove a document without loading the entity
    pub fn deindex(
        &self,
        resource_key: &str,
        id: &str,
        attributes: &DimensionAttributes,
    ) -> Result<()> {
        info!("Deindexing {} '{}' at {}", resource_key, id, attributes);
        self.index
            .deindex(resource_key, id, attributes)
            .map_err(|error| index_failure("Deindexing", resource_key, id, error))
    }
}

fn index_failure(
    operation: &str,
    resource_key: &str,
    id: &str,
    error: ContentError,
) -> ContentError {
    warn!("{} {} '{}' failed: {}", operation, resource_key, id, error);
    match error {
        ContentError::Index(_) => error,
        other => ContentError::Index(format!(
            "{} {} '{}': {}",
            operation, resource_key, id, other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::ContentMerger;
    use crate::repository::EntityDimensionContentRepository;
    use dimension::ContentKind;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingIndex {
        indexed: Mutex<Vec<IndexDocument>>,
        removed: Mutex<Vec<(String, String, DimensionAttributes)>>,
    }

    impl SearchIndex for RecordingIndex {
        fn index(&self, document: IndexDocument) -> Result<()> {
            self.indexed.lock().unwrap().push(document);
            Ok(())
        }

        fn deindex(
            &self,
            resource_key: &str,
            id: &str,
            attributes: &DimensionAttributes,
        ) -> Result<()> {
            self.removed
                .lock()
                .unwrap()
                .push((resource_key.to_string(), id.to_string(), attributes.clone()));
            Ok(())
        }
    }

    struct UnavailableIndex;

    impl SearchIndex for UnavailableIndex {
        fn index(&self, _document: IndexDocument) -> Result<()> {
            Err(ContentError::invalid("title", "rejected by index"))
        }

        fn deindex(&self, _: &str, _: &str, _: &DimensionAttributes) -> Result<()> {
            Err(ContentError::Index("connection refused".to_string()))
        }
    }

    fn indexer(index: Arc<dyn SearchIndex>) -> ContentIndexer {
        let aggregator = Arc::new(ContentAggregator::new(
            Arc::new(EntityDimensionContentRepository),
            Arc::new(ContentMerger::default()),
        ));
        ContentIndexer::new(aggregator, index)
    }

    fn entity_with_english_live() -> ContentRichEntity {
        let mut entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        let mut unlocalized =
            entity.create_dimension_content(DimensionAttributes::default().with_stage(Stage::Live));
        unlocalized.add_available_locale("en");
        unlocalized.set_ghost_locale(Some("en"));
        entity.add_dimension_content(unlocalized).unwrap();

        let mut english = entity.create_dimension_content(DimensionAttributes::live("en"));
        english
            .template_mut()
            .unwrap()
            .data
            .insert("title".to_string(), json!("Hello"));
        entity.add_dimension_content(english).unwrap();
        entity
    }

    #[test]
    fn test_index_document() {
        let index = Arc::new(RecordingIndex::default());
        let entity = entity_with_english_live();

        indexer(index.clone())
            .index(&entity, &DimensionAttributes::live("en"))
            .unwrap();

        let indexed = index.indexed.lock().unwrap();
        assert_eq!(indexed.len(), 1);
        let document = &indexed[0];
        assert_eq!(document.resource_key, "pages");
        assert_eq!(document.locale.as_deref(), Some("en"));
        assert_eq!(document.stage, Stage::Live);
        assert_eq!(document.data["title"], json!("Hello"));
        assert_eq!(document.content_hash.len(), 64);
    }

    #[test]
    fn test_ghost_content_is_deindexed() {
        let index = Arc::new(RecordingIndex::default());
        let entity = entity_with_english_live();

        let result = indexer(index.clone()).index(&entity, &DimensionAttributes::live("de"));

        assert!(matches!(result, Err(ContentError::ContentNotFound { .. })));
        assert!(index.indexed.lock().unwrap().is_empty());
        let removed = index.removed.lock().unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].2, DimensionAttributes::live("de"));
    }

    #[test]
    fn test_index_failures_surface_as_index_errors() {
        let indexer = indexer(Arc::new(UnavailableIndex));
        let entity = entity_with_english_live();

        let indexed = indexer.index(&entity, &DimensionAttributes::live("en"));
        assert!(matches!(
            indexed,
            Err(ContentError::Index(ref message)) if message.contains("rejected by index")
        ));

        let deindexed = indexer.deindex("pages", "page-1", &DimensionAttributes::live("en"));
        assert!(matches!(
            deindexed,
            Err(ContentError::Index(ref message)) if message == "connection refused"
        ));
    }
}
