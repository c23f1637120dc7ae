//! Read-side aggregation of an entity's dimension contents

use crate::error::ContentError;
use crate::merger::ContentMerger;
use crate::repository::DimensionContentRepository;
use crate::Result;
use dimension::{
    ContentRichEntity, DimensionAttributes, DimensionContent, DimensionContentCollection, Stage,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct ContentAggregator {
    repository: Arc<dyn DimensionContentRepository>,
    merger: Arc<ContentMerger>,
}

impl ContentAggregator {
    pub fn new(
        repository: Arc<dyn DimensionContentRepository>,
        merger: Arc<ContentMerger>,
    ) -> Self {
        Self { repository, merger }
    }

    /// Merge the unlocalized and the localized record for the attributes.
    ///
    /// Without a localized record the unlocalized one is returned on its own;
    /// its ghost locale tells the caller which translation exists. An entity
    /// without any draft yet yields a blank, unregistered draft.
    pub fn aggregate(
        &self,
        entity: &ContentRichEntity,
        attributes: &DimensionAttributes,
    ) -> Result<DimensionContent> {
        let loaded = self.repository.load(entity, attributes);

        let mut ordered = Vec::with_capacity(2);
        if let Some(unlocalized) = loaded.unlocalized() {
            ordered.push(unlocalized.clone());
        }
        if attributes.is_localized() {
            if let Some(localized) = loaded.localized() {
                ordered.push(localized.clone());
            }
        }

        if ordered.is_empty() {
            if attributes.stage != Stage::Draft {
                return Err(ContentError::ContentNotFound {
                    resource_key: entity.resource_key().to_string(),
                    id: entity.id().to_string(),
                    attributes: attributes.clone(),
                });
            }

            debug!(
                "No dimension content for {} at {}, using a blank draft",
                entity.resource_ref(),
                attributes
            );
            ordered.push(entity.create_dimension_content(attributes.unlocalized()));
            if attributes.is_localized() {
                ordered.push(entity.create_dimension_content(attributes.clone()));
            }
        } else if attributes.is_localized() && ordered.len() == 1 && ordered[0].locale().is_none() {
            info!(
                "{} has no {} translation, falling back to ghost locale {:?}",
                entity.resource_ref(),
                attributes,
                ordered[0].ghost_locale()
            );
        }

        let collection =
            DimensionContentCollection::new(ordered, attributes.clone(), entity.kind().clone());
        self.merger.merge(&collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::EntityDimensionContentRepository;
    use dimension::ContentKind;
    use serde_json::json;

    fn aggregator() -> ContentAggregator {
        ContentAggregator::new(
            Arc::new(EntityDimensionContentRepository),
            Arc::new(ContentMerger::default()),
        )
    }

    #[test]
    fn test_blank_draft_for_new_entity() {
        let entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");

        let merged = aggregator()
            .aggregate(&entity, &DimensionAttributes::draft("en"))
            .unwrap();

        assert_eq!(merged.locale(), Some("en"));
        assert_eq!(merged.stage(), Stage::Draft);
        assert!(merged.template_data().unwrap().is_empty());
        assert!(entity.dimension_contents().is_empty());
    }

    #[test]
    fn test_missing_live_is_not_found() {
        let entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");

        let result = aggregator().aggregate(&entity, &DimensionAttributes::live("en"));
        assert!(matches!(result, Err(ContentError::ContentNotFound { .. })));
    }

    #[test]
    fn test_ghost_fallback() {
        let mut entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        let mut unlocalized = entity.create_dimension_content(DimensionAttributes::default());
        unlocalized.set_ghost_locale(Some("en"));
        unlocalized.add_available_locale("en");
        unlocalized
            .template_mut()
            .unwrap()
            .data
            .insert("layout".to_string(), json!("wide"));
        entity.add_dimension_content(unlocalized).unwrap();

        let mut english = entity.create_dimension_content(DimensionAttributes::draft("en"));
        english
            .template_mut()
            .unwrap()
            .data
            .insert("title".to_string(), json!("Hello"));
        entity.add_dimension_content(english).unwrap();

        let merged = aggregator()
            .aggregate(&entity, &DimensionAttributes::draft("de"))
            .unwrap();

        assert_eq!(merged.locale(), None);
        assert_eq!(merged.ghost_locale(), Some("en"));
        let data = merged.template_data().unwrap();
        assert_eq!(data.get("layout"), Some(&json!("wide")));
        assert!(data.get("title").is_none());
    }
}
