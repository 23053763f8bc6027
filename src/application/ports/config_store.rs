use crate::application::ApplicationResult;
use async_trait::async_trait;
use serde_json::Value;

/// Hierarchical project configuration. Paths are `/` separated
/// (`addons/acme/gallery/install`); intermediate nodes are objects.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, path: &str) -> ApplicationResult<Option<Value>>;
    async fn set(&self, path: &str, value: Value) -> ApplicationResult<()>;
    async fn remove(&self, path: &str) -> ApplicationResult<()>;
}
