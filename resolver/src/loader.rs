use crate::error::Result;
use crate::view::ResourceId;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// Loads referenced resources in bulk.
///
/// Ids the loader does not know are left out of the returned map.
pub trait ResourceLoader: Send + Sync {
    fn load(&self, ids: &[ResourceId], locale: &str) -> Result<HashMap<ResourceId, Value>>;
}

/// Ids requested per loader key
pub type ResourceRequests = BTreeMap<String, BTreeSet<ResourceId>>;

/// Loaded resources per loader key
pub type LoadedResources = HashMap<String, HashMap<ResourceId, Value>>;

/// Resource loaders keyed by their loader key (`media`, `page`, ...)
#[derive(Default, Clone)]
pub struct ResourceLoaderRegistry {
    loaders: HashMap<String, Arc<dyn ResourceLoader>>,
}

impl ResourceLoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, loader_key: impl Into<String>, loader: Arc<dyn ResourceLoader>) {
        self.loaders.insert(loader_key.into(), loader);
    }

    pub fn get(&self, loader_key: &str) -> Option<&Arc<dyn ResourceLoader>> {
        self.loaders.get(loader_key)
    }

    pub fn load(
        &self,
        loader_key: &str,
        ids: &[ResourceId],
        locale: &str,
    ) -> Result<HashMap<ResourceId, Value>> {
        match self.loaders.get(loader_key) {
            Some(loader) => loader.load(ids, locale),
            None => {
                warn!(
                    "No resource loader registered for '{}', {} references left unresolved",
                    loader_key,
                    ids.len()
                );
                Ok(HashMap::new())
            }
        }
    }

    /// Run one load per loader key
    pub fn load_all(&self, requests: &ResourceRequests, locale: &str) -> Result<LoadedResources> {
        let mut loaded = HashMap::with_capacity(requests.len());
        for (loader_key, ids) in requests {
            let ids: Vec<ResourceId> = ids.iter().cloned().collect();
            debug!("Loading {} '{}' resources for locale {}", ids.len(), loader_key, locale);
            loaded.insert(loader_key.clone(), self.load(loader_key, &ids, locale)?);
        }
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct CountingLoader {
        calls: Mutex<Vec<usize>>,
    }

    impl ResourceLoader for CountingLoader {
        fn load(&self, ids: &[ResourceId], locale: &str) -> Result<HashMap<ResourceId, Value>> {
            self.calls.lock().unwrap().push(ids.len());
            Ok(ids
                .iter()
                .filter(|id| **id != ResourceId::Int(404))
                .map(|id| (id.clone(), json!({"id": id.to_value(), "locale": locale})))
                .collect())
        }
    }

    #[test]
    fn test_load_all_batches_per_key() {
        let loader = Arc::new(CountingLoader {
            calls: Mutex::new(Vec::new()),
        });
        let mut registry = ResourceLoaderRegistry::new();
        registry.register("media", loader.clone());

        let mut requests = ResourceRequests::new();
        requests
            .entry("media".to_string())
            .or_default()
            .extend([ResourceId::Int(1), ResourceId::Int(2), ResourceId::Int(404)]);
        requests
            .entry("unknown".to_string())
            .or_default()
            .insert(ResourceId::Int(1));

        let loaded = registry.load_all(&requests, "de").unwrap();

        assert_eq!(*loader.calls.lock().unwrap(), vec![3]);
        assert_eq!(loaded["media"].len(), 2);
        assert_eq!(loaded["media"][&ResourceId::Int(1)]["locale"], json!("de"));
        assert!(loaded["unknown"].is_empty());
    }
}
