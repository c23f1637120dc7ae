//! Copying content between locales, stages and entities

use crate::aggregator::ContentAggregator;
use crate::normalizer::{ContentNormalizer, SYSTEM_KEYS};
use crate::persister::ContentPersister;
use crate::Result;
use dimension::{ContentRichEntity, DimensionAttributes, DimensionContent};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Copies the merged content of one attribute set onto another.
///
/// Copies go through the regular persist path, so the target ends up with
/// exactly the records a save of the same data would create. Template fields
/// the source does not carry are cleared on the target.
pub struct ContentCopier {
    aggregator: Arc<ContentAggregator>,
    persister: Arc<ContentPersister>,
    normalizer: ContentNormalizer,
}

impl ContentCopier {
    pub fn new(aggregator: Arc<ContentAggregator>, persister: Arc<ContentPersister>) -> Self {
        Self {
            aggregator,
            persister,
            normalizer: ContentNormalizer,
        }
    }

    /// Copy from one entity onto another
    pub fn copy(
        &self,
        source: &ContentRichEntity,
        source_attributes: &DimensionAttributes,
        target: &mut ContentRichEntity,
        target_attributes: &DimensionAttributes,
        ignored: &[&str],
    ) -> Result<DimensionContent> {
        let content = self.aggregator.aggregate(source, source_attributes)?;
        self.copy_from_dimension_content(&content, target, target_attributes, ignored)
    }

    /// Copy between two attribute sets of the same entity, e.g. draft to live
    pub fn copy_within(
        &self,
        entity: &mut ContentRichEntity,
        source_attributes: &DimensionAttributes,
        target_attributes: &DimensionAttributes,
        ignored: &[&str],
    ) -> Result<DimensionContent> {
        let content = self.aggregator.aggregate(entity, source_attributes)?;
        self.copy_from_dimension_content(&content, entity, target_attributes, ignored)
    }

    /// Persist an already merged dimension content onto a target
    pub fn copy_from_dimension_content(
        &self,
        content: &DimensionContent,
        target: &mut ContentRichEntity,
        target_attributes: &DimensionAttributes,
        ignored: &[&str],
    ) -> Result<DimensionContent> {
        let mut data = self.normalizer.normalize(content);
        data.retain(|key, _| {
            !SYSTEM_KEYS.contains(&key.as_str()) && !ignored.contains(&key.as_str())
        });

        for key in stale_template_keys(target, target_attributes) {
            if !ignored.contains(&key.as_str()) {
                data.entry(key).or_insert(Value::Null);
            }
        }

        debug!(
            "Copying {} from {} onto {} at {}",
            content.attributes(),
            content.resource(),
            target.resource_ref(),
            target_attributes
        );
        self.persister.persist(target, &data, target_attributes)
    }
}

/// Template keys currently stored on the target records
fn stale_template_keys(
    target: &ContentRichEntity,
    attributes: &DimensionAttributes,
) -> Vec<String> {
    let mut keys = Vec::new();
    for record in [
        target.dimension_content(&attributes.unlocalized()),
        target.dimension_content(attributes),
    ]
    .into_iter()
    .flatten()
    {
        if let Some(data) = record.template_data() {
            keys.extend(data.keys().cloned());
        }
    }
    keys
}
