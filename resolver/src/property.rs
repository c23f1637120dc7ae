//! Per field type resolution of raw template values

use crate::view::{Content, ContentView, ResolvableResource, ResourceId};
use fields::FieldType;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Turns the raw value of one field into a view.
///
/// Implementations never fail: data they cannot interpret resolves to
/// `ContentView::null(params)`.
pub trait PropertyResolver: Send + Sync {
    fn resolve(&self, data: &Value, locale: &str, params: &Map<String, Value>) -> ContentView;
}

/// Field params plus one resolved key; the resolved key wins over a param
/// of the same name
fn view_with(key: &str, value: Value, params: &Map<String, Value>) -> Map<String, Value> {
    let mut view = params.clone();
    view.insert(key.to_string(), value);
    view
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// Passes values through unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPropertyResolver;

impl PropertyResolver for DefaultPropertyResolver {
    fn resolve(&self, data: &Value, _locale: &str, params: &Map<String, Value>) -> ContentView {
        if data.is_null() {
            return ContentView::null(params);
        }
        ContentView::value(data.clone(), params.clone())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SingleSelectPropertyResolver;

impl PropertyResolver for SingleSelectPropertyResolver {
    fn resolve(&self, data: &Value, _locale: &str, params: &Map<String, Value>) -> ContentView {
        if !is_scalar(data) {
            return ContentView::null(params);
        }
        ContentView::value(data.clone(), view_with("id", data.clone(), params))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SelectPropertyResolver;

impl PropertyResolver for SelectPropertyResolver {
    fn resolve(&self, data: &Value, _locale: &str, params: &Map<String, Value>) -> ContentView {
        let Some(items) = data.as_array() else {
            return ContentView::null(params);
        };
        let values: Vec<Value> = items.iter().filter(|v| is_scalar(v)).cloned().collect();
        ContentView::value(
            Value::Array(values.clone()),
            view_with("ids", Value::Array(values), params),
        )
    }
}

/// A single reference stored as a plain id
pub struct SingleReferencePropertyResolver {
    loader_key: String,
}

impl SingleReferencePropertyResolver {
    pub fn new(loader_key: impl Into<String>) -> Self {
        Self {
            loader_key: loader_key.into(),
        }
    }
}

impl PropertyResolver for SingleReferencePropertyResolver {
    fn resolve(&self, data: &Value, _locale: &str, params: &Map<String, Value>) -> ContentView {
        let Some(id) = ResourceId::from_value(data) else {
            return ContentView::null(params);
        };
        ContentView::new(
            Content::Resource(ResolvableResource::new(id.clone(), &self.loader_key)),
            view_with("id", id.to_value(), params),
        )
    }
}

/// A list of references stored as plain ids
pub struct ReferenceListPropertyResolver {
    loader_key: String,
}

impl ReferenceListPropertyResolver {
    pub fn new(loader_key: impl Into<String>) -> Self {
        Self {
            loader_key: loader_key.into(),
        }
    }
}

impl PropertyResolver for ReferenceListPropertyResolver {
    fn resolve(&self, data: &Value, _locale: &str, params: &Map<String, Value>) -> ContentView {
        let Some(items) = data.as_array() else {
            return ContentView::null(params);
        };
        references(items, &self.loader_key, Map::new(), params)
    }
}

fn references(
    items: &[Value],
    loader_key: &str,
    stored: Map<String, Value>,
    params: &Map<String, Value>,
) -> ContentView {
    let ids: Vec<ResourceId> = items.iter().filter_map(ResourceId::from_value).collect();
    let mut view = params.clone();
    view.extend(stored);
    view.insert(
        "ids".to_string(),
        Value::Array(ids.iter().map(ResourceId::to_value).collect()),
    );

    ContentView::new(
        Content::Resources(
            ids.into_iter()
                .map(|id| ResolvableResource::new(id, loader_key))
                .collect(),
        ),
        view,
    )
}

/// Display options stored next to media references
fn display_option(object: &Map<String, Value>) -> Map<String, Value> {
    let mut view = Map::new();
    if let Some(option) = object.get("displayOption") {
        view.insert("displayOption".to_string(), option.clone());
    }
    view
}

/// Media lists are stored as `{"ids": [..], "displayOption": ..}`
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaSelectionPropertyResolver;

impl PropertyResolver for MediaSelectionPropertyResolver {
    fn resolve(&self, data: &Value, _locale: &str, params: &Map<String, Value>) -> ContentView {
        let Some(object) = data.as_object() else {
            return ContentView::null(params);
        };
        let Some(items) = object.get("ids").and_then(Value::as_array) else {
            return ContentView::null(params);
        };
        references(items, "media", display_option(object), params)
    }
}

/// A single medium is stored as `{"id": .., "displayOption": ..}`
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleMediaSelectionPropertyResolver;

impl PropertyResolver for SingleMediaSelectionPropertyResolver {
    fn resolve(&self, data: &Value, _locale: &str, params: &Map<String, Value>) -> ContentView {
        let Some(object) = data.as_object() else {
            return ContentView::null(params);
        };
        let Some(id) = object.get("id").and_then(ResourceId::from_value) else {
            return ContentView::null(params);
        };

        let mut view = params.clone();
        view.extend(display_option(object));
        view.insert("id".to_string(), id.to_value());
        ContentView::new(
            Content::Resource(ResolvableResource::new(id, "media")),
            view,
        )
    }
}

/// Property resolvers keyed by field type
pub struct PropertyResolverPool {
    resolvers: HashMap<FieldType, Arc<dyn PropertyResolver>>,
    fallback: Arc<dyn PropertyResolver>,
}

impl Default for PropertyResolverPool {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl PropertyResolverPool {
    /// An empty pool resolving everything with the default resolver
    pub fn new() -> Self {
        Self {
            resolvers: HashMap::new(),
            fallback: Arc::new(DefaultPropertyResolver),
        }
    }

    /// A pool with a resolver for every selection type
    pub fn with_defaults() -> Self {
        let mut pool = Self::new();
        pool.register(FieldType::SingleSelect, Arc::new(SingleSelectPropertyResolver));
        pool.register(FieldType::Select, Arc::new(SelectPropertyResolver));
        pool.register(FieldType::MediaSelection, Arc::new(MediaSelectionPropertyResolver));
        pool.register(
            FieldType::SingleMediaSelection,
            Arc::new(SingleMediaSelectionPropertyResolver),
        );

        for field_type in [
            FieldType::CategorySelection,
            FieldType::PageSelection,
            FieldType::TagSelection,
        ] {
            if let Some(loader_key) = field_type.resource_loader_key() {
                pool.register(field_type, Arc::new(ReferenceListPropertyResolver::new(loader_key)));
            }
        }
        for field_type in [
            FieldType::SingleCategorySelection,
            FieldType::SinglePageSelection,
        ] {
            if let Some(loader_key) = field_type.resource_loader_key() {
                pool.register(
                    field_type,
                    Arc::new(SingleReferencePropertyResolver::new(loader_key)),
                );
            }
        }
        pool
    }

    pub fn register(&mut self, field_type: FieldType, resolver: Arc<dyn PropertyResolver>) {
        self.resolvers.insert(field_type, resolver);
    }

    /// Resolver for a field type, falling back to the default resolver
    pub fn get(&self, field_type: FieldType) -> &dyn PropertyResolver {
        self.resolvers
            .get(&field_type)
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    pub fn has(&self, field_type: FieldType) -> bool {
        self.resolvers.contains_key(&field_type)
    }
}
