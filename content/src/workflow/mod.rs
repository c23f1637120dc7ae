//! Workflow transitions over the draft and live stages

mod definition;

pub use definition::{Transition, TransitionEffect, WorkflowDefinition};

use crate::aggregator::ContentAggregator;
use crate::copier::ContentCopier;
use crate::error::{ContentError, WorkflowError};
use crate::factory::DimensionContentCollectionFactory;
use crate::Result;
use chrono::Utc;
use dimension::{
    AttributeFilter, Capability, ContentRichEntity, DimensionAttributes, DimensionContent, Stage,
};
use serde_json::Map;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Applies named workflow transitions to an entity.
///
/// The workflow place lives on the draft record of the requested locale.
/// Transitions with an effect also touch the live stage.
pub struct ContentWorkflow {
    definition: Arc<WorkflowDefinition>,
    aggregator: Arc<ContentAggregator>,
    factory: Arc<DimensionContentCollectionFactory>,
    copier: Arc<ContentCopier>,
}

impl ContentWorkflow {
    pub fn new(
        definition: Arc<WorkflowDefinition>,
        aggregator: Arc<ContentAggregator>,
        factory: Arc<DimensionContentCollectionFactory>,
        copier: Arc<ContentCopier>,
    ) -> Self {
        Self {
            definition,
            aggregator,
            factory,
            copier,
        }
    }

    pub fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }

    /// The draft place for the attributes; records without one are in the
    /// initial place
    pub fn current_place(
        &self,
        entity: &ContentRichEntity,
        attributes: &DimensionAttributes,
    ) -> String {
        let draft = attributes.clone().with_stage(Stage::Draft);
        entity
            .dimension_content(&draft)
            .and_then(DimensionContent::workflow_place)
            .unwrap_or(&self.definition.initial_place)
            .to_string()
    }

    /// Transitions that can fire for the attributes right now
    pub fn enabled_transitions(
        &self,
        entity: &ContentRichEntity,
        attributes: &DimensionAttributes,
    ) -> Vec<String> {
        let place = self.current_place(entity, attributes);
        self.definition
            .enabled_transitions(&place)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Fire a transition and return the merged draft afterwards
    pub fn apply(
        &self,
        entity: &mut ContentRichEntity,
        attributes: &DimensionAttributes,
        transition_name: &str,
    ) -> Result<DimensionContent> {
        if !entity.kind().capabilities.supports(Capability::Workflow) {
            return Err(ContentError::UnsupportedCapability {
                capability: Capability::Workflow.to_string(),
                resource_key: entity.resource_key().to_string(),
            });
        }

        let transition = self
            .definition
            .transition(transition_name)
            .ok_or_else(|| WorkflowError::UnknownTransition {
                transition: transition_name.to_string(),
                workflow: self.definition.name.clone(),
            })?
            .clone();

        let draft = attributes.clone().with_stage(Stage::Draft);
        let place = self.current_place(entity, &draft);
        if !transition.can_fire_from(&place) {
            return Err(WorkflowError::TransitionNotAllowed {
                transition: transition.name,
                place,
            }
            .into());
        }

        let snapshot = entity.clone();
        if let Err(error) = self.fire(entity, &draft, &transition) {
            warn!(
                "Transition '{}' failed for {} at {}, entity left unchanged: {}",
                transition.name,
                entity.resource_ref(),
                draft,
                error
            );
            *entity = snapshot;
            return Err(error);
        }

        info!(
            "Applied transition '{}' to {} at {}: {} -> {}",
            transition.name,
            entity.resource_ref(),
            draft,
            place,
            transition.to
        );
        self.aggregator.aggregate(entity, &draft)
    }

    fn fire(
        &self,
        entity: &mut ContentRichEntity,
        draft: &DimensionAttributes,
        transition: &Transition,
    ) -> Result<()> {
        self.factory.create(entity, draft, &Map::new())?;

        match transition.effect {
            TransitionEffect::None => {}
            TransitionEffect::Publish => self.publish(entity, draft, &transition.to)?,
            TransitionEffect::Unpublish => self.unpublish(entity, draft),
            TransitionEffect::RemoveDraft => self.remove_draft(entity, draft)?,
        }
        set_place(entity, draft, &transition.to);
        Ok(())
    }

    /// Copy the draft onto live, then stamp both with the publish time
    fn publish(
        &self,
        entity: &mut ContentRichEntity,
        draft: &DimensionAttributes,
        place: &str,
    ) -> Result<()> {
        let live = draft.clone().with_stage(Stage::Live);
        self.copier.copy_within(entity, draft, &live, &[])?;

        let published = Utc::now();
        for attributes in [draft, &live] {
            if let Some(workflow) = entity
                .dimension_content_mut(attributes)
                .and_then(DimensionContent::workflow_mut)
            {
                workflow.published = Some(published);
            }
        }
        set_place(entity, &live, place);
        Ok(())
    }

    fn unpublish(&self, entity: &mut ContentRichEntity, draft: &DimensionAttributes) {
        let live = draft.clone().with_stage(Stage::Live);

        match live.locale() {
            Some(locale) => {
                entity.remove_dimension_contents(&AttributeFilter::from(&live));

                let unlocalized = live.unlocalized();
                let orphaned = match entity.dimension_content_mut(&unlocalized) {
                    Some(record) => {
                        record.remove_available_locale(locale);
                        if record.ghost_locale() == Some(locale) {
                            let next = record.available_locales().iter().next().cloned();
                            record.set_ghost_locale(next.as_deref());
                        }
                        record.available_locales().is_empty()
                    }
                    None => false,
                };
                if orphaned {
                    entity.remove_dimension_contents(&AttributeFilter::from(&unlocalized));
                }
            }
            None => {
                entity.remove_dimension_contents(&AttributeFilter::new().stage(Stage::Live));
            }
        }

        if let Some(workflow) = entity
            .dimension_content_mut(draft)
            .and_then(DimensionContent::workflow_mut)
        {
            workflow.published = None;
        }
        debug!("Unpublished {} at {}", entity.resource_ref(), draft);
    }

    fn remove_draft(
        &self,
        entity: &mut ContentRichEntity,
        draft: &DimensionAttributes,
    ) -> Result<()> {
        let live = draft.clone().with_stage(Stage::Live);
        self.copier.copy_within(entity, &live, draft, &[])?;
        Ok(())
    }
}

fn set_place(entity: &mut ContentRichEntity, attributes: &DimensionAttributes, place: &str) {
    if let Some(workflow) = entity
        .dimension_content_mut(attributes)
        .and_then(DimensionContent::workflow_mut)
    {
        workflow.place = Some(place.to_string());
    }
}
