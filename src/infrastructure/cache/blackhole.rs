use crate::application::{
    ApplicationResult,
    ports::cache::{Cache, validate_key, validate_namespace},
};
use async_trait::async_trait;

/// Accepts every write and never returns anything. Disables caching.
#[derive(Default, Clone)]
pub struct BlackholeCache;

#[async_trait]
impl Cache for BlackholeCache {
    async fn get(&self, namespace: &str, key: &str) -> ApplicationResult<Option<String>> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        Ok(None)
    }

    async fn set(&self, namespace: &str, key: &str, _value: &str) -> ApplicationResult<()> {
        validate_namespace(namespace)?;
        validate_key(key)
    }

    async fn delete(&self, namespace: &str, key: &str) -> ApplicationResult<()> {
        validate_namespace(namespace)?;
        validate_key(key)
    }

    async fn exists(&self, namespace: &str, key: &str) -> ApplicationResult<bool> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        Ok(false)
    }

    async fn flush(&self, namespace: &str, _recursive: bool) -> ApplicationResult<()> {
        validate_namespace(namespace)
    }
}
