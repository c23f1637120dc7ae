//! Public entry point combining the content services

use crate::aggregator::ContentAggregator;
use crate::copier::ContentCopier;
use crate::error::ContentError;
use crate::factory::DimensionContentCollectionFactory;
use crate::hashing::has_content_changed;
use crate::indexer::{ContentIndexer, SearchIndex};
use crate::mapper::ContentDataMapper;
use crate::merger::ContentMerger;
use crate::normalizer::ContentNormalizer;
use crate::persister::ContentPersister;
use crate::repository::{DimensionContentRepository, EntityDimensionContentRepository};
use crate::workflow::{ContentWorkflow, WorkflowDefinition};
use crate::Result;
use dimension::{AttributeFilter, ContentRichEntity, DimensionAttributes, DimensionContent, Stage};
use fields::MetadataProvider;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

pub struct ContentManager {
    aggregator: Arc<ContentAggregator>,
    persister: Arc<ContentPersister>,
    copier: Arc<ContentCopier>,
    workflow: Arc<ContentWorkflow>,
    indexer: Arc<ContentIndexer>,
    normalizer: ContentNormalizer,
}

impl ContentManager {
    pub fn new(
        aggregator: Arc<ContentAggregator>,
        persister: Arc<ContentPersister>,
        copier: Arc<ContentCopier>,
        workflow: Arc<ContentWorkflow>,
        indexer: Arc<ContentIndexer>,
    ) -> Self {
        Self {
            aggregator,
            persister,
            copier,
            workflow,
            indexer,
            normalizer: ContentNormalizer,
        }
    }

    /// Wire the standard merger and data mapper chains over the entity's
    /// own records
    pub fn with_defaults(
        metadata: Arc<dyn MetadataProvider>,
        workflow: WorkflowDefinition,
        index: Arc<dyn SearchIndex>,
    ) -> Result<Self> {
        Self::with_repository(
            Arc::new(EntityDimensionContentRepository),
            metadata,
            workflow,
            index,
        )
    }

    pub fn with_repository(
        repository: Arc<dyn DimensionContentRepository>,
        metadata: Arc<dyn MetadataProvider>,
        workflow: WorkflowDefinition,
        index: Arc<dyn SearchIndex>,
    ) -> Result<Self> {
        workflow.validate()?;

        let data_mapper = Arc::new(ContentDataMapper::with_defaults(
            metadata,
            &workflow.initial_place,
        ));
        let aggregator = Arc::new(ContentAggregator::new(
            repository.clone(),
            Arc::new(ContentMerger::default()),
        ));
        let factory = Arc::new(DimensionContentCollectionFactory::new(repository, data_mapper));
        let persister = Arc::new(ContentPersister::new(factory.clone(), aggregator.clone()));
        let copier = Arc::new(ContentCopier::new(aggregator.clone(), persister.clone()));
        let workflow = Arc::new(ContentWorkflow::new(
            Arc::new(workflow),
            aggregator.clone(),
            factory,
            copier.clone(),
        ));
        let indexer = Arc::new(ContentIndexer::new(aggregator.clone(), index));

        Ok(Self::new(aggregator, persister, copier, workflow, indexer))
    }

    pub fn workflow(&self) -> &ContentWorkflow {
        &self.workflow
    }

    /// Merged content for the attributes
    pub fn resolve(
        &self,
        entity: &ContentRichEntity,
        attributes: &DimensionAttributes,
    ) -> Result<DimensionContent> {
        self.aggregator.aggregate(entity, attributes)
    }

    pub fn persist(
        &self,
        entity: &mut ContentRichEntity,
        data: &Map<String, Value>,
        attributes: &DimensionAttributes,
    ) -> Result<DimensionContent> {
        self.persister.persist(entity, data, attributes)
    }

    pub fn normalize(&self, content: &DimensionContent) -> Map<String, Value> {
        self.normalizer.normalize(content)
    }

    pub fn copy(
        &self,
        source: &ContentRichEntity,
        source_attributes: &DimensionAttributes,
        target: &mut ContentRichEntity,
        target_attributes: &DimensionAttributes,
    ) -> Result<DimensionContent> {
        self.copier
            .copy(source, source_attributes, target, target_attributes, &[])
    }

    /// Copy between locales or stages of one entity
    pub fn copy_within(
        &self,
        entity: &mut ContentRichEntity,
        source_attributes: &DimensionAttributes,
        target_attributes: &DimensionAttributes,
    ) -> Result<DimensionContent> {
        self.copier
            .copy_within(entity, source_attributes, target_attributes, &[])
    }

    pub fn apply_transition(
        &self,
        entity: &mut ContentRichEntity,
        attributes: &DimensionAttributes,
        transition: &str,
    ) -> Result<DimensionContent> {
        self.workflow.apply(entity, attributes, transition)
    }

    pub fn index(
        &self,
        entity: &ContentRichEntity,
        attributes: &DimensionAttributes,
    ) -> Result<DimensionContent> {
        self.indexer.index(entity, attributes)
    }

    pub fn deindex(
        &self,
        resource_key: &str,
        id: &str,
        attributes: &DimensionAttributes,
    ) -> Result<()> {
        self.indexer.deindex(resource_key, id, attributes)
    }

    /// Remove a translation from both stages and from the index.
    /// Returns the number of removed records.
    pub fn remove_locale(&self, entity: &mut ContentRichEntity, locale: &str) -> Result<usize> {
        let removed =
            entity.remove_dimension_contents(&AttributeFilter::new().locale(Some(locale)));

        for stage in [Stage::Draft, Stage::Live] {
            let unlocalized = DimensionAttributes::new(None, stage);
            if let Some(record) = entity.dimension_content_mut(&unlocalized) {
                record.remove_available_locale(locale);
                if record.ghost_locale() == Some(locale) {
                    let next = record.available_locales().iter().next().cloned();
                    record.set_ghost_locale(next.as_deref());
                }
            }
            self.indexer.deindex(
                entity.resource_key(),
                entity.id(),
                &DimensionAttributes::new(Some(locale), stage),
            )?;
        }

        info!(
            "Removed locale {} ({} records) from {}",
            locale,
            removed,
            entity.resource_ref()
        );
        Ok(removed)
    }

    /// Whether the draft differs from what is live for the attributes
    pub fn has_unpublished_changes(
        &self,
        entity: &ContentRichEntity,
        attributes: &DimensionAttributes,
    ) -> Result<bool> {
        let draft = self
            .aggregator
            .aggregate(entity, &attributes.clone().with_stage(Stage::Draft))?;
        let live = match self
            .aggregator
            .aggregate(entity, &attributes.clone().with_stage(Stage::Live))
        {
            Ok(live) => live,
            Err(ContentError::ContentNotFound { .. }) => return Ok(true),
            Err(error) => return Err(error),
        };

        Ok(has_content_changed(
            &self.normalize(&draft),
            &self.normalize(&live),
        ))
    }
}
