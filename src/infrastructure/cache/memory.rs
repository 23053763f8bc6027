use super::{is_within, namespace_chain, physical_key};
use crate::application::{
    ApplicationResult,
    ports::cache::{Cache, validate_key, validate_namespace},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};

const PREFIX: &str = "mem";

#[derive(Default)]
struct State {
    versions: HashMap<String, u64>,
    entries: HashMap<String, String>,
    /// Logical keys stored directly in each namespace.
    direct: BTreeMap<String, HashSet<String>>,
}

impl State {
    fn physical(&self, namespace: &str, key: &str) -> String {
        let versions: Vec<u64> = namespace_chain(namespace)
            .into_iter()
            .map(|ns| self.versions.get(ns).copied().unwrap_or(0))
            .collect();
        physical_key(PREFIX, namespace, &versions, key)
    }

    fn drop_direct(&mut self, namespace: &str) {
        if let Some(keys) = self.direct.remove(namespace) {
            for key in keys {
                let physical = self.physical(namespace, &key);
                self.entries.remove(&physical);
            }
        }
    }
}

/// Process-local cache.
#[derive(Default)]
pub struct MemoryCache {
    state: Mutex<State>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, namespace: &str, key: &str) -> ApplicationResult<Option<String>> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        let state = self.state.lock();
        Ok(state.entries.get(&state.physical(namespace, key)).cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: &str) -> ApplicationResult<()> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        let mut state = self.state.lock();
        let physical = state.physical(namespace, key);
        state.entries.insert(physical, value.to_string());
        state
            .direct
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string());
        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> ApplicationResult<()> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        let mut state = self.state.lock();
        let physical = state.physical(namespace, key);
        state.entries.remove(&physical);
        if let Some(keys) = state.direct.get_mut(namespace) {
            keys.remove(key);
        }
        Ok(())
    }

    async fn exists(&self, namespace: &str, key: &str) -> ApplicationResult<bool> {
        Ok(self.get(namespace, key).await?.is_some())
    }

    async fn flush(&self, namespace: &str, recursive: bool) -> ApplicationResult<()> {
        validate_namespace(namespace)?;
        let mut state = self.state.lock();
        if !recursive {
            state.drop_direct(namespace);
            return Ok(());
        }

        // free the entries first, their physical names change with the bump
        let nested: Vec<String> = state
            .direct
            .keys()
            .filter(|ns| is_within(ns, namespace))
            .cloned()
            .collect();
        for ns in &nested {
            state.drop_direct(ns);
        }
        *state.versions.entry(namespace.to_string()).or_insert(0) += 1;
        tracing::debug!(namespace, dropped_namespaces = nested.len(), "cache namespace flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recursive_flush_reaches_nested_namespaces_only() {
        let cache = MemoryCache::new();
        cache.set("sly.article.row", "1_1", "a").await.unwrap();
        cache.set("sly.article", "top", "b").await.unwrap();
        cache.set("sly.slice", "1_1_0_*", "c").await.unwrap();

        cache.flush("sly.article", true).await.unwrap();

        assert_eq!(cache.get("sly.article.row", "1_1").await.unwrap(), None);
        assert_eq!(cache.get("sly.article", "top").await.unwrap(), None);
        assert_eq!(cache.get("sly.slice", "1_1_0_*").await.unwrap().as_deref(), Some("c"));
        assert_eq!(cache.len(), 1);

        cache.set("sly.article.row", "1_1", "fresh").await.unwrap();
        assert_eq!(cache.get("sly.article.row", "1_1").await.unwrap().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn plain_flush_keeps_nested_namespaces() {
        let cache = MemoryCache::new();
        cache.set("sly", "config", "x").await.unwrap();
        cache.set("sly.medium", "7", "y").await.unwrap();

        cache.flush("sly", false).await.unwrap();

        assert!(!cache.exists("sly", "config").await.unwrap());
        assert!(cache.exists("sly.medium", "7").await.unwrap());
    }

    #[tokio::test]
    async fn rejects_malformed_names() {
        let cache = MemoryCache::new();
        assert!(cache.set("sly..x", "k", "v").await.is_err());
        assert!(cache.set("sly", "a key", "v").await.is_err());
    }
}
