use crate::error::WorkflowError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Side effect a transition has beyond moving the place
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionEffect {
    #[default]
    None,
    /// Copy the draft onto the live stage
    Publish,
    /// Remove the live records of the locale
    Unpublish,
    /// Reset the draft to the live content
    RemoveDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub name: String,
    pub from: Vec<String>,
    pub to: String,
    #[serde(default)]
    pub effect: TransitionEffect,
}

impl Transition {
    pub fn new(name: &str, from: &[&str], to: &str) -> Self {
        Self {
            name: name.to_string(),
            from: from.iter().map(|place| place.to_string()).collect(),
            to: to.to_string(),
            effect: TransitionEffect::None,
        }
    }

    pub fn with_effect(mut self, effect: TransitionEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn can_fire_from(&self, place: &str) -> bool {
        self.from.iter().any(|from| from == place)
    }
}

/// A workflow state machine loaded from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    pub places: Vec<String>,
    pub initial_place: String,
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl Default for WorkflowDefinition {
    /// The standard content workflow with a separate draft cycle for
    /// published content
    fn default() -> Self {
        Self {
            name: "content_workflow".to_string(),
            places: ["unpublished", "review", "published", "draft", "review_draft"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            initial_place: "unpublished".to_string(),
            transitions: vec![
                Transition::new("request_for_review", &["unpublished"], "review"),
                Transition::new("reject", &["review"], "unpublished"),
                Transition::new(
                    "publish",
                    &["unpublished", "review", "draft", "review_draft"],
                    "published",
                )
                .with_effect(TransitionEffect::Publish),
                Transition::new("unpublish", &["published", "draft", "review_draft"], "unpublished")
                    .with_effect(TransitionEffect::Unpublish),
                Transition::new("create_draft", &["published"], "draft"),
                Transition::new("remove_draft", &["draft", "review_draft"], "published")
                    .with_effect(TransitionEffect::RemoveDraft),
                Transition::new("request_for_review_draft", &["draft"], "review_draft"),
                Transition::new("reject_draft", &["review_draft"], "draft"),
            ],
        }
    }
}

impl WorkflowDefinition {
    pub fn from_yaml(content: &str) -> Result<Self, WorkflowError> {
        let definition: Self = serde_yaml::from_str(content)
            .map_err(|e| WorkflowError::InvalidDefinition(format!("Failed to parse YAML: {}", e)))?;
        definition.validate()?;

        debug!(
            "Parsed workflow '{}' with {} transitions",
            definition.name,
            definition.transitions.len()
        );
        Ok(definition)
    }

    pub fn from_file(path: &Path) -> Result<Self, WorkflowError> {
        info!("Loading workflow definition from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| {
            WorkflowError::InvalidDefinition(format!("Failed to read {:?}: {}", path, e))
        })?;
        Self::from_yaml(&content)
    }

    /// Check that every referenced place exists and names are unique
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let mut places = HashSet::new();
        for place in &self.places {
            if !places.insert(place.as_str()) {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "Place '{}' is defined twice",
                    place
                )));
            }
        }

        if !places.contains(self.initial_place.as_str()) {
            return Err(WorkflowError::InvalidDefinition(format!(
                "Initial place '{}' is not a place of workflow '{}'",
                self.initial_place, self.name
            )));
        }

        let mut names = HashSet::new();
        for transition in &self.transitions {
            if !names.insert(transition.name.as_str()) {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "Transition '{}' is defined twice",
                    transition.name
                )));
            }
            if transition.from.is_empty() {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "Transition '{}' has no source place",
                    transition.name
                )));
            }
            for place in transition.from.iter().chain(std::iter::once(&transition.to)) {
                if !places.contains(place.as_str()) {
                    return Err(WorkflowError::InvalidDefinition(format!(
                        "Transition '{}' references unknown place '{}'",
                        transition.name, place
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn transition(&self, name: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.name == name)
    }

    /// Names of the transitions that can fire from a place
    pub fn enabled_transitions(&self, place: &str) -> Vec<&str> {
        self.transitions
            .iter()
            .filter(|t| t.can_fire_from(place))
            .map(|t| t.name.as_str())
            .collect()
    }
}
