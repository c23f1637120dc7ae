//! Resolvers for the concerns of a dimension content

use crate::error::{ResolverError, Result};
use crate::metadata::MetadataResolver;
use crate::view::{Content, ContentView};
use dimension::{Capability, DimensionContent};
use fields::{Field, FieldType, MetadataProvider};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Locale used for metadata when content carries neither a locale nor a
/// ghost locale
const FALLBACK_LOCALE: &str = "en";

/// The locale a merged record is rendered in
pub fn view_locale(content: &DimensionContent) -> &str {
    content
        .locale()
        .or_else(|| content.ghost_locale())
        .unwrap_or(FALLBACK_LOCALE)
}

/// Resolves one capability of a dimension content into a view
pub trait DimensionContentResolver: Send + Sync {
    /// Name of the resolved part, e.g. `seo`
    fn key(&self) -> &str;

    fn capability(&self) -> Capability;

    fn resolve(&self, content: &DimensionContent) -> Result<ContentView>;
}

fn require(resolver: &dyn DimensionContentResolver, content: &DimensionContent) -> Result<()> {
    if content.has_capability(resolver.capability()) {
        return Ok(());
    }
    Err(ResolverError::UnsupportedCapability {
        resolver: resolver.key().to_string(),
        capability: resolver.capability().to_string(),
        resource_key: content.resource().resource_key().to_string(),
    })
}

/// Resolves template data with the metadata of the record's template
pub struct TemplateResolver {
    metadata: Arc<dyn MetadataProvider>,
    resolver: MetadataResolver,
}

impl TemplateResolver {
    pub fn new(metadata: Arc<dyn MetadataProvider>, resolver: MetadataResolver) -> Self {
        Self { metadata, resolver }
    }
}

impl DimensionContentResolver for TemplateResolver {
    fn key(&self) -> &str {
        "template"
    }

    fn capability(&self) -> Capability {
        Capability::Template
    }

    fn resolve(&self, content: &DimensionContent) -> Result<ContentView> {
        require(self, content)?;

        let resource = content.resource();
        let (Some(template_type), Some(template_key)) =
            (resource.kind.template_type.as_deref(), content.template_key())
        else {
            return Err(ResolverError::MissingTemplate {
                resource_key: resource.resource_key().to_string(),
                id: resource.id.clone(),
            });
        };

        let locale = view_locale(content);
        let metadata = self.metadata.get_metadata(template_type, locale)?;
        let form = metadata.require_form(template_key, locale)?;

        let empty = Map::new();
        let data = content.template_data().unwrap_or(&empty);
        let views = self.resolver.resolve_items(form.fields(), data, locale);

        let mut view = Map::new();
        view.insert("template".to_string(), Value::from(template_key));
        Ok(ContentView::new(Content::Map(views), view))
    }
}

/// Form of the SEO tab; the search result preview only exists in the admin
fn seo_fields() -> Vec<Field> {
    vec![
        Field::new("seoTitle", FieldType::TextLine, "Title"),
        Field::new("seoDescription", FieldType::TextArea, "Description"),
        Field::new("seoKeywords", FieldType::TextLine, "Keywords"),
        Field::new("seoCanonicalUrl", FieldType::Url, "Canonical URL"),
        Field::new("seoNoIndex", FieldType::Checkbox, "No index"),
        Field::new("seoNoFollow", FieldType::Checkbox, "No follow"),
        Field::new("seoHideInSitemap", FieldType::Checkbox, "Hide in sitemap"),
        Field::new("seoSearchResult", FieldType::SearchResult, "Search result"),
    ]
}

pub struct SeoResolver {
    fields: Vec<Field>,
    resolver: MetadataResolver,
}

impl SeoResolver {
    pub fn new(resolver: MetadataResolver) -> Self {
        Self {
            fields: seo_fields(),
            resolver,
        }
    }
}

impl DimensionContentResolver for SeoResolver {
    fn key(&self) -> &str {
        "seo"
    }

    fn capability(&self) -> Capability {
        Capability::Seo
    }

    fn resolve(&self, content: &DimensionContent) -> Result<ContentView> {
        require(self, content)?;
        let mut data = Map::new();
        if let Some(seo) = content.seo() {
            data.insert("seoTitle".to_string(), json!(seo.title));
            data.insert("seoDescription".to_string(), json!(seo.description));
            data.insert("seoKeywords".to_string(), json!(seo.keywords));
            data.insert("seoCanonicalUrl".to_string(), json!(seo.canonical_url));
            data.insert("seoNoIndex".to_string(), json!(seo.no_index));
            data.insert("seoNoFollow".to_string(), json!(seo.no_follow));
            data.insert("seoHideInSitemap".to_string(), json!(seo.hide_in_sitemap));
        }

        let views = self
            .resolver
            .resolve_items(&self.fields, &data, view_locale(content));
        Ok(ContentView::new(Content::Map(views), Map::new()))
    }
}

fn excerpt_fields() -> Vec<Field> {
    vec![
        Field::new("excerptTitle", FieldType::TextLine, "Title"),
        Field::new("excerptMore", FieldType::TextLine, "More text"),
        Field::new("excerptDescription", FieldType::TextEditor, "Description"),
        Field::new("excerptCategories", FieldType::CategorySelection, "Categories"),
        Field::new("excerptTags", FieldType::TagSelection, "Tags"),
        Field::new("excerptImage", FieldType::SingleMediaSelection, "Image"),
        Field::new("excerptIcon", FieldType::SingleMediaSelection, "Icon"),
    ]
}

pub struct ExcerptResolver {
    fields: Vec<Field>,
    resolver: MetadataResolver,
}

impl ExcerptResolver {
    pub fn new(resolver: MetadataResolver) -> Self {
        Self {
            fields: excerpt_fields(),
            resolver,
        }
    }
}

impl DimensionContentResolver for ExcerptResolver {
    fn key(&self) -> &str {
        "excerpt"
    }

    fn capability(&self) -> Capability {
        Capability::Excerpt
    }

    fn resolve(&self, content: &DimensionContent) -> Result<ContentView> {
        require(self, content)?;
        let mut data = Map::new();
        if let Some(excerpt) = content.excerpt() {
            data.insert("excerptTitle".to_string(), json!(excerpt.title));
            data.insert("excerptMore".to_string(), json!(excerpt.more));
            data.insert("excerptDescription".to_string(), json!(excerpt.description));
            data.insert("excerptCategories".to_string(), json!(excerpt.categories));
            data.insert("excerptTags".to_string(), json!(excerpt.tags));
            if let Some(image) = excerpt.image {
                data.insert("excerptImage".to_string(), json!({ "id": image }));
            }
            if let Some(icon) = excerpt.icon {
                data.insert("excerptIcon".to_string(), json!({ "id": icon }));
            }
        }

        let views = self
            .resolver
            .resolve_items(&self.fields, &data, view_locale(content));
        Ok(ContentView::new(Content::Map(views), Map::new()))
    }
}
