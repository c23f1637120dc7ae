//! Merging dimension contents into one composite view

mod mergers;

pub use mergers::{
    AuthorMerger, DimensionContentMerger, ExcerptMerger, SeoMerger, TemplateMerger, WorkflowMerger,
};

use crate::error::ContentError;
use crate::Result;
use dimension::{DimensionContent, DimensionContentCollection};
use tracing::debug;

/// Copies one concern from a source record onto the merged record.
///
/// Mergers only touch the target when the source carries data for their
/// concern.
pub trait Merger: Send + Sync {
    fn merge(&self, target: &mut DimensionContent, source: &DimensionContent);
}

/// The merger chain used by default, one merger per capability
pub fn default_mergers() -> Vec<Box<dyn Merger>> {
    vec![
        Box::new(DimensionContentMerger),
        Box::new(TemplateMerger),
        Box::new(WorkflowMerger),
        Box::new(ExcerptMerger),
        Box::new(SeoMerger),
        Box::new(AuthorMerger),
    ]
}

/// Runs the merger chain over a collection
pub struct ContentMerger {
    mergers: Vec<Box<dyn Merger>>,
}

impl Default for ContentMerger {
    fn default() -> Self {
        Self::new(default_mergers())
    }
}

impl ContentMerger {
    pub fn new(mergers: Vec<Box<dyn Merger>>) -> Self {
        Self { mergers }
    }

    /// Merge every record of the collection, in collection order, into a
    /// fresh record. Later records override earlier ones field by field.
    pub fn merge(&self, collection: &DimensionContentCollection) -> Result<DimensionContent> {
        let first = collection.first().ok_or(ContentError::EmptyCollection)?;

        let mut merged = DimensionContent::new(
            first.resource().clone(),
            collection.dimension_attributes().unlocalized(),
        );

        for content in collection {
            if let Some(locale) = content.locale() {
                merged.set_locale(Some(locale));
            }
            merged.set_stage(content.stage());

            for merger in &self.mergers {
                merger.merge(&mut merged, content);
            }
        }

        merged.mark_as_merged();
        debug!(
            "Merged {} dimension contents of {} into {}",
            collection.len(),
            merged.resource(),
            merged.attributes()
        );

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimension::{ContentKind, ContentRichEntity, DimensionAttributes, Stage};
    use serde_json::json;

    #[test]
    fn test_empty_collection_fails() {
        let collection = DimensionContentCollection::new(
            vec![],
            DimensionAttributes::draft("en"),
            ContentKind::page(),
        );

        assert!(matches!(
            ContentMerger::default().merge(&collection),
            Err(ContentError::EmptyCollection)
        ));
        assert!(matches!(
            ContentMerger::new(vec![]).merge(&collection),
            Err(ContentError::EmptyCollection)
        ));
    }

    #[test]
    fn test_merge_layers_localized_over_unlocalized() {
        let entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");

        let mut unlocalized = entity.create_dimension_content(DimensionAttributes::default());
        let template = unlocalized.template_mut().unwrap();
        template.template_key = Some("default".to_string());
        template.data.insert("layout".to_string(), json!("wide"));
        template.data.insert("title".to_string(), json!("Fallback"));

        let mut localized = entity.create_dimension_content(DimensionAttributes::draft("en"));
        localized
            .template_mut()
            .unwrap()
            .data
            .insert("title".to_string(), json!("Hello"));

        let collection = DimensionContentCollection::new(
            vec![localized, unlocalized],
            DimensionAttributes::draft("en"),
            ContentKind::page(),
        );

        let merged = ContentMerger::default().merge(&collection).unwrap();

        assert!(merged.is_merged());
        assert_eq!(merged.locale(), Some("en"));
        assert_eq!(merged.stage(), Stage::Draft);
        assert_eq!(merged.template_key(), Some("default"));
        let data = merged.template_data().unwrap();
        assert_eq!(data.get("title"), Some(&json!("Hello")));
        assert_eq!(data.get("layout"), Some(&json!("wide")));
    }

    #[test]
    fn test_merge_does_not_touch_sources() {
        let entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        let unlocalized = entity.create_dimension_content(DimensionAttributes::default());
        let collection = DimensionContentCollection::new(
            vec![unlocalized.clone()],
            DimensionAttributes::default(),
            ContentKind::page(),
        );

        let merged = ContentMerger::default().merge(&collection).unwrap();

        assert!(!collection.first().unwrap().is_merged());
        assert_eq!(collection.first(), Some(&unlocalized));
        assert_eq!(merged.locale(), None);
    }
}
