use crate::error::Result;
use crate::loader::{LoadedResources, ResourceLoaderRegistry, ResourceRequests};
use crate::metadata::MetadataResolver;
use crate::property::PropertyResolverPool;
use crate::resolvers::{
    view_locale, DimensionContentResolver, ExcerptResolver, SeoResolver, TemplateResolver,
};
use crate::view::{Content, ContentView, ResolvableResource};
use dimension::DimensionContent;
use fields::MetadataProvider;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Content and view of one resolved part
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPart {
    pub content: Value,
    pub view: Value,
}

/// Render-ready form of a merged dimension content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedContent {
    pub resource_key: String,
    pub id: String,
    pub locale: String,
    /// Set when the requested translation is missing and the view shows
    /// unlocalized content of this locale instead
    pub ghost_locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub content: Value,
    pub view: Value,
    /// Extension parts such as `seo` and `excerpt`, keyed by resolver key
    pub extension: BTreeMap<String, ResolvedPart>,
}

/// Resolves merged dimension contents into plain content and view trees.
///
/// All references found across the template and the extensions are loaded
/// with a single call per loader key.
pub struct ContentResolver {
    template: Arc<dyn DimensionContentResolver>,
    extensions: Vec<Arc<dyn DimensionContentResolver>>,
    loaders: Arc<ResourceLoaderRegistry>,
}

impl ContentResolver {
    pub fn new(
        template: Arc<dyn DimensionContentResolver>,
        extensions: Vec<Arc<dyn DimensionContentResolver>>,
        loaders: Arc<ResourceLoaderRegistry>,
    ) -> Self {
        Self {
            template,
            extensions,
            loaders,
        }
    }

    /// Template resolver plus the excerpt and SEO extensions
    pub fn with_defaults(
        metadata: Arc<dyn MetadataProvider>,
        loaders: Arc<ResourceLoaderRegistry>,
    ) -> Self {
        let resolver = MetadataResolver::new(Arc::new(PropertyResolverPool::with_defaults()));
        Self::new(
            Arc::new(TemplateResolver::new(metadata, resolver.clone())),
            vec![
                Arc::new(ExcerptResolver::new(resolver.clone())),
                Arc::new(SeoResolver::new(resolver)),
            ],
            loaders,
        )
    }

    pub fn resolve(&self, content: &DimensionContent) -> Result<ResolvedContent> {
        let resource = content.resource();
        let locale = view_locale(content).to_string();
        let ghost_locale = match content.locale() {
            Some(_) => None,
            None => content.ghost_locale().map(str::to_string),
        };
        if let Some(ghost) = &ghost_locale {
            debug!("Resolving {} from ghost locale {}", resource, ghost);
        }

        let mut template = if content.has_capability(self.template.capability()) {
            Some(self.template.resolve(content)?)
        } else {
            None
        };

        let mut extensions = Vec::with_capacity(self.extensions.len());
        for resolver in &self.extensions {
            if !content.has_capability(resolver.capability()) {
                debug!("Skipping {} extension for {}", resolver.key(), resource);
                continue;
            }
            extensions.push((resolver.key().to_string(), resolver.resolve(content)?));
        }

        let mut requests = ResourceRequests::new();
        for view in template.iter().chain(extensions.iter().map(|(_, view)| view)) {
            collect_resources(view, &mut requests);
        }
        let loaded = self.loaders.load_all(&requests, &locale)?;

        if let Some(view) = template.as_mut() {
            replace_resources(view, &loaded);
        }
        for (_, view) in extensions.iter_mut() {
            replace_resources(view, &loaded);
        }

        let (content_value, view_value) = match template {
            Some(view) => view.into_parts(),
            None => (Value::Object(Map::new()), Value::Object(Map::new())),
        };
        let extension = extensions
            .into_iter()
            .map(|(key, view)| {
                let (content, view) = view.into_parts();
                (key, ResolvedPart { content, view })
            })
            .collect();

        Ok(ResolvedContent {
            resource_key: resource.resource_key().to_string(),
            id: resource.id.clone(),
            locale,
            ghost_locale,
            template: content.template_key().map(str::to_string),
            content: content_value,
            view: view_value,
            extension,
        })
    }
}

fn collect_resources(view: &ContentView, requests: &mut ResourceRequests) {
    match view.content() {
        Content::Resource(resource) => {
            requests
                .entry(resource.loader_key.clone())
                .or_default()
                .insert(resource.id.clone());
        }
        Content::Resources(resources) => {
            for resource in resources {
                requests
                    .entry(resource.loader_key.clone())
                    .or_default()
                    .insert(resource.id.clone());
            }
        }
        Content::Views(items) => items.iter().for_each(|item| collect_resources(item, requests)),
        Content::Map(children) => children
            .values()
            .for_each(|child| collect_resources(child, requests)),
        Content::Null | Content::Value(_) => {}
    }
}

fn lookup(resource: &ResolvableResource, loaded: &LoadedResources) -> Option<Value> {
    let found = loaded
        .get(&resource.loader_key)
        .and_then(|resources| resources.get(&resource.id))
        .cloned();
    if found.is_none() {
        warn!(
            "Reference to {} '{}' could not be resolved",
            resource.loader_key, resource.id
        );
    }
    found
}

/// Swap references for loaded data; single references that cannot be
/// loaded become null and missing list entries are dropped
fn replace_resources(view: &mut ContentView, loaded: &LoadedResources) {
    let content = view.content_mut();
    let replaced = match content {
        Content::Resource(resource) => match lookup(resource, loaded) {
            Some(value) => Content::Value(value),
            None => Content::Null,
        },
        Content::Resources(resources) => Content::Value(Value::Array(
            resources
                .iter()
                .filter_map(|resource| lookup(resource, loaded))
                .collect(),
        )),
        Content::Views(items) => {
            items.iter_mut().for_each(|item| replace_resources(item, loaded));
            return;
        }
        Content::Map(children) => {
            children
                .values_mut()
                .for_each(|child| replace_resources(child, loaded));
            return;
        }
        Content::Null | Content::Value(_) => return,
    };
    *content = replaced;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolverError;
    use crate::loader::ResourceLoader;
    use crate::view::ResourceId;
    use dimension::{ContentKind, ContentRichEntity, DimensionAttributes};
    use fields::{Field, FieldType, FormMetadata, FormMetadataRegistry, TypedFormMetadata};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryLoader {
        entries: HashMap<ResourceId, Value>,
        calls: Mutex<usize>,
    }

    impl MemoryLoader {
        fn with(entries: Vec<(ResourceId, Value)>) -> Self {
            Self {
                entries: entries.into_iter().collect(),
                calls: Mutex::new(0),
            }
        }
    }

    impl ResourceLoader for MemoryLoader {
        fn load(&self, ids: &[ResourceId], _locale: &str) -> Result<HashMap<ResourceId, Value>> {
            *self.calls.lock().unwrap() += 1;
            Ok(ids
                .iter()
                .filter_map(|id| self.entries.get(id).map(|value| (id.clone(), value.clone())))
                .collect())
        }
    }

    struct FailingLoader;

    impl ResourceLoader for FailingLoader {
        fn load(&self, _ids: &[ResourceId], _locale: &str) -> Result<HashMap<ResourceId, Value>> {
            Err(ResolverError::Loader {
                loader_key: "media".to_string(),
                message: "storage offline".to_string(),
            })
        }
    }

    fn metadata() -> Arc<dyn MetadataProvider> {
        let fields = vec![
            Field::new("title", FieldType::TextLine, "Title"),
            Field::new("teaser", FieldType::SinglePageSelection, "Teaser"),
            Field::new("related", FieldType::PageSelection, "Related"),
            Field::new("image", FieldType::SingleMediaSelection, "Image"),
            Field::new("tags", FieldType::TagSelection, "Tags"),
        ];
        let mut registry = FormMetadataRegistry::new();
        registry
            .register(
                TypedFormMetadata::new("page")
                    .with_form(FormMetadata::new("default", fields.clone()), "default"),
            )
            .unwrap();
        registry
            .register(
                TypedFormMetadata::new("snippet")
                    .with_form(FormMetadata::new("default", fields), "default"),
            )
            .unwrap();
        Arc::new(registry)
    }

    fn content(kind: ContentKind) -> DimensionContent {
        let entity = ContentRichEntity::with_id(kind, "page-1");
        let mut content = entity.create_dimension_content(DimensionAttributes::live("en"));
        let template = content.template_mut().unwrap();
        template.template_key = Some("default".to_string());
        template.data = json!({
            "title": "Home",
            "teaser": "page-404",
            "related": ["page-2", "page-404", "page-3"],
            "image": {"id": 1},
            "tags": ["news"]
        })
        .as_object()
        .cloned()
        .unwrap();
        content
    }

    fn loaders(
        media: Arc<dyn ResourceLoader>,
        pages: Arc<MemoryLoader>,
    ) -> Arc<ResourceLoaderRegistry> {
        let mut registry = ResourceLoaderRegistry::new();
        registry.register("media", media);
        registry.register("page", pages);
        Arc::new(registry)
    }

    fn pages() -> Arc<MemoryLoader> {
        Arc::new(MemoryLoader::with(vec![
            (ResourceId::Str("page-2".to_string()), json!({"title": "Two"})),
            (ResourceId::Str("page-3".to_string()), json!({"title": "Three"})),
        ]))
    }

    #[test]
    fn test_resolve_replaces_references() {
        let pages = pages();
        let media = Arc::new(MemoryLoader::with(vec![(
            ResourceId::Int(1),
            json!({"url": "/media/1.jpg"}),
        )]));
        let mut page = content(ContentKind::page());
        page.excerpt_mut().unwrap().image = Some(1);
        let resolver =
            ContentResolver::with_defaults(metadata(), loaders(media.clone(), pages.clone()));

        let resolved = resolver.resolve(&page).unwrap();

        assert_eq!(resolved.resource_key, "pages");
        assert_eq!(resolved.template.as_deref(), Some("default"));
        assert_eq!(resolved.content["title"], json!("Home"));
        assert_eq!(resolved.content["teaser"], Value::Null);
        assert_eq!(resolved.view["teaser"]["id"], json!("page-404"));
        assert_eq!(
            resolved.content["related"],
            json!([{"title": "Two"}, {"title": "Three"}])
        );
        assert_eq!(resolved.content["image"], json!({"url": "/media/1.jpg"}));
        // no tag loader is registered
        assert_eq!(resolved.content["tags"], json!([]));

        assert_eq!(
            resolved.extension["excerpt"].content["excerptImage"],
            json!({"url": "/media/1.jpg"})
        );
        assert!(resolved.extension.contains_key("seo"));

        // template and excerpt media share one load
        assert_eq!(*media.calls.lock().unwrap(), 1);
        assert_eq!(*pages.calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_snippet_skips_seo_extension() {
        let resolver = ContentResolver::with_defaults(
            metadata(),
            loaders(Arc::new(MemoryLoader::default()), pages()),
        );

        let resolved = resolver.resolve(&content(ContentKind::snippet())).unwrap();

        assert_eq!(resolved.resource_key, "snippets");
        assert!(resolved.extension.contains_key("excerpt"));
        assert!(!resolved.extension.contains_key("seo"));
    }

    #[test]
    fn test_loader_failure_propagates() {
        let resolver =
            ContentResolver::with_defaults(metadata(), loaders(Arc::new(FailingLoader), pages()));

        let result = resolver.resolve(&content(ContentKind::page()));

        assert!(matches!(result, Err(ResolverError::Loader { .. })));
    }

    #[test]
    fn test_serializes_camel_case() {
        let resolver = ContentResolver::with_defaults(
            metadata(),
            loaders(Arc::new(MemoryLoader::default()), pages()),
        );

        let resolved = resolver.resolve(&content(ContentKind::page())).unwrap();
        let json = serde_json::to_value(&resolved).unwrap();

        assert_eq!(json["resourceKey"], json!("pages"));
        assert_eq!(json["locale"], json!("en"));
        assert_eq!(json["ghostLocale"], Value::Null);
        assert!(json["extension"]["seo"]["view"].is_object());
    }

    #[test]
    fn test_ghost_fallback_is_flagged() {
        let entity = ContentRichEntity::with_id(ContentKind::page(), "page-1");
        let mut unlocalized = entity.create_dimension_content(DimensionAttributes::default());
        unlocalized.set_ghost_locale(Some("en"));
        unlocalized.add_available_locale("en");
        let template = unlocalized.template_mut().unwrap();
        template.template_key = Some("default".to_string());
        template.data.insert("title".to_string(), json!("Hello"));
        let resolver = ContentResolver::with_defaults(
            metadata(),
            loaders(Arc::new(MemoryLoader::default()), pages()),
        );

        let ghost = resolver.resolve(&unlocalized).unwrap();
        assert_eq!(ghost.locale, "en");
        assert_eq!(ghost.ghost_locale.as_deref(), Some("en"));
        assert_eq!(ghost.content["title"], json!("Hello"));
        let json = serde_json::to_value(&ghost).unwrap();
        assert_eq!(json["ghostLocale"], json!("en"));

        let translated = resolver.resolve(&content(ContentKind::page())).unwrap();
        assert!(translated.ghost_locale.is_none());
    }
}
