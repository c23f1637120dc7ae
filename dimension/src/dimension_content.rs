use crate::attributes::{DimensionAttributes, Stage};
use crate::kind::{Capability, ResourceRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeSet;

/// Template key plus the structured field data of the template
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemplateData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_key: Option<String>,
    #[serde(default)]
    pub data: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExcerptData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Media id of the excerpt image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<i64>,
    /// Media id of the excerpt icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeoData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub no_index: bool,
    #[serde(default)]
    pub no_follow: bool,
    #[serde(default)]
    pub hide_in_sitemap: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authored: Option<DateTime<Utc>>,
}

/// One slice of a content rich entity for a given attribute set.
///
/// Capability structures are present exactly when the owning content kind
/// supports the capability. Records built by the merger carry the `merged`
/// flag and are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimensionContent {
    resource: ResourceRef,
    attributes: DimensionAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ghost_locale: Option<String>,
    #[serde(default)]
    available_locales: BTreeSet<String>,
    #[serde(skip)]
    merged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template: Option<TemplateData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    workflow: Option<WorkflowData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    excerpt: Option<ExcerptData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seo: Option<SeoData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<AuthorData>,
}

impl DimensionContent {
    /// Create an empty record for a resource. Prefer
    /// `ContentRichEntity::create_dimension_content` in application code.
    pub fn new(resource: ResourceRef, attributes: DimensionAttributes) -> Self {
        let capabilities = resource.kind.capabilities;
        Self {
            attributes,
            ghost_locale: None,
            available_locales: BTreeSet::new(),
            merged: false,
            template: capabilities.template.then(TemplateData::default),
            workflow: capabilities.workflow.then(WorkflowData::default),
            excerpt: capabilities.excerpt.then(ExcerptData::default),
            seo: capabilities.seo.then(SeoData::default),
            author: capabilities.author.then(AuthorData::default),
            resource,
        }
    }

    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    pub fn attributes(&self) -> &DimensionAttributes {
        &self.attributes
    }

    pub fn locale(&self) -> Option<&str> {
        self.attributes.locale.as_deref()
    }

    pub fn set_locale(&mut self, locale: Option<&str>) {
        self.attributes.locale = locale.map(str::to_string);
    }

    pub fn stage(&self) -> Stage {
        self.attributes.stage
    }

    pub fn set_stage(&mut self, stage: Stage) {
        self.attributes.stage = stage;
    }

    pub fn ghost_locale(&self) -> Option<&str> {
        self.ghost_locale.as_deref()
    }

    pub fn set_ghost_locale(&mut self, locale: Option<&str>) {
        self.ghost_locale = locale.map(str::to_string);
    }

    /// Set the ghost locale unless one is already recorded.
    /// Returns whether the value changed.
    pub fn set_ghost_locale_if_absent(&mut self, locale: &str) -> bool {
        if self.ghost_locale.is_some() {
            return false;
        }
        self.ghost_locale = Some(locale.to_string());
        true
    }

    pub fn available_locales(&self) -> &BTreeSet<String> {
        &self.available_locales
    }

    pub fn add_available_locale(&mut self, locale: &str) {
        self.available_locales.insert(locale.to_string());
    }

    pub fn remove_available_locale(&mut self, locale: &str) -> bool {
        self.available_locales.remove(locale)
    }

    pub fn is_merged(&self) -> bool {
        self.merged
    }

    pub fn mark_as_merged(&mut self) {
        self.merged = true;
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::Template => self.template.is_some(),
            Capability::Workflow => self.workflow.is_some(),
            Capability::Excerpt => self.excerpt.is_some(),
            Capability::Seo => self.seo.is_some(),
            Capability::Author => self.author.is_some(),
        }
    }

    pub fn template(&self) -> Option<&TemplateData> {
        self.template.as_ref()
    }

    pub fn template_mut(&mut self) -> Option<&mut TemplateData> {
        self.template.as_mut()
    }

    pub fn workflow(&self) -> Option<&WorkflowData> {
        self.workflow.as_ref()
    }

    pub fn workflow_mut(&mut self) -> Option<&mut WorkflowData> {
        self.workflow.as_mut()
    }

    pub fn excerpt(&self) -> Option<&ExcerptData> {
        self.excerpt.as_ref()
    }

    pub fn excerpt_mut(&mut self) -> Option<&mut ExcerptData> {
        self.excerpt.as_mut()
    }

    pub fn seo(&self) -> Option<&SeoData> {
        self.seo.as_ref()
    }

    pub fn seo_mut(&mut self) -> Option<&mut SeoData> {
        self.seo.as_mut()
    }

    pub fn author(&self) -> Option<&AuthorData> {
        self.author.as_ref()
    }

    pub fn author_mut(&mut self) -> Option<&mut AuthorData> {
        self.author.as_mut()
    }

    /// Template key, if the record carries the template capability and has one
    pub fn template_key(&self) -> Option<&str> {
        self.template.as_ref()?.template_key.as_deref()
    }

    /// Template field data, empty when the capability is missing
    pub fn template_data(&self) -> Option<&Map<String, JsonValue>> {
        self.template.as_ref().map(|t| &t.data)
    }

    pub fn workflow_place(&self) -> Option<&str> {
        self.workflow.as_ref()?.place.as_deref()
    }
}
