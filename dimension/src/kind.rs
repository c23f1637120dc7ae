use serde::{Deserialize, Serialize};
use std::fmt;

/// A behaviour bundle a dimension content may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Template,
    Workflow,
    Excerpt,
    Seo,
    Author,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Template => "template",
            Capability::Workflow => "workflow",
            Capability::Excerpt => "excerpt",
            Capability::Seo => "seo",
            Capability::Author => "author",
        };
        f.write_str(name)
    }
}

/// Capabilities supported by every dimension content of a content kind
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capabilities {
    #[serde(default)]
    pub template: bool,
    #[serde(default)]
    pub workflow: bool,
    #[serde(default)]
    pub excerpt: bool,
    #[serde(default)]
    pub seo: bool,
    #[serde(default)]
    pub author: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            template: true,
            workflow: true,
            excerpt: true,
            seo: true,
            author: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        match capability {
            Capability::Template => self.template = true,
            Capability::Workflow => self.workflow = true,
            Capability::Excerpt => self.excerpt = true,
            Capability::Seo => self.seo = true,
            Capability::Author => self.author = true,
        }
        self
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Template => self.template,
            Capability::Workflow => self.workflow,
            Capability::Excerpt => self.excerpt,
            Capability::Seo => self.seo,
            Capability::Author => self.author,
        }
    }
}

/// Describes a kind of content rich entity (pages, snippets, articles, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentKind {
    pub resource_key: String,
    /// Form key used to look up template metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl ContentKind {
    pub fn new(resource_key: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            resource_key: resource_key.into(),
            template_type: None,
            capabilities,
        }
    }

    pub fn with_template_type(mut self, template_type: impl Into<String>) -> Self {
        self.template_type = Some(template_type.into());
        self
    }

    pub fn page() -> Self {
        Self::new("pages", Capabilities::all()).with_template_type("page")
    }

    pub fn article() -> Self {
        Self::new("articles", Capabilities::all()).with_template_type("article")
    }

    pub fn snippet() -> Self {
        Self::new(
            "snippets",
            Capabilities::none()
                .with(Capability::Template)
                .with(Capability::Workflow)
                .with(Capability::Excerpt),
        )
        .with_template_type("snippet")
    }
}

/// Back-reference from a dimension content to its owning entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ContentKind,
    pub id: String,
}

impl ResourceRef {
    pub fn resource_key(&self) -> &str {
        &self.kind.resource_key
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind.resource_key, self.id)
    }
}
