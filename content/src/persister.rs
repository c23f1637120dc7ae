use crate::aggregator::ContentAggregator;
use crate::factory::DimensionContentCollectionFactory;
use crate::Result;
use dimension::{ContentRichEntity, DimensionAttributes, DimensionContent};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// Saves submitted data and returns the merged view of what was written
pub struct ContentPersister {
    factory: Arc<DimensionContentCollectionFactory>,
    aggregator: Arc<ContentAggregator>,
}

impl ContentPersister {
    pub fn new(
        factory: Arc<DimensionContentCollectionFactory>,
        aggregator: Arc<ContentAggregator>,
    ) -> Self {
        Self {
            factory,
            aggregator,
        }
    }

    pub fn persist(
        &self,
        entity: &mut ContentRichEntity,
        data: &Map<String, Value>,
        attributes: &DimensionAttributes,
    ) -> Result<DimensionContent> {
        let collection = self.factory.create(entity, attributes, data)?;
        info!(
            "Persisted {} keys onto {} dimension contents of {}",
            data.len(),
            collection.len(),
            entity.resource_ref()
        );

        self.aggregator
            .aggregate(entity, collection.dimension_attributes())
    }
}
