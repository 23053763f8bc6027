// src/application/ports/cache.rs
use crate::application::{ApplicationError, ApplicationResult};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// Namespaced key/value cache.
///
/// Namespaces are dot separated (`sly.article.list`). Flushing a namespace
/// recursively also invalidates every namespace nested below it.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, namespace: &str, key: &str) -> ApplicationResult<Option<String>>;
    async fn set(&self, namespace: &str, key: &str, value: &str) -> ApplicationResult<()>;
    async fn delete(&self, namespace: &str, key: &str) -> ApplicationResult<()>;
    async fn exists(&self, namespace: &str, key: &str) -> ApplicationResult<bool>;
    async fn flush(&self, namespace: &str, recursive: bool) -> ApplicationResult<()>;
}

impl dyn Cache {
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        namespace: &str,
        key: &str,
    ) -> ApplicationResult<Option<T>> {
        match self.get(namespace, key).await? {
            None => Ok(None),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(err) => {
                    // stale layout after an upgrade; treat as a miss
                    tracing::debug!(namespace, key, error = %err, "dropping undecodable cache entry");
                    self.delete(namespace, key).await?;
                    Ok(None)
                }
            },
        }
    }

    pub async fn set_json<T: Serialize + Sync>(
        &self,
        namespace: &str,
        key: &str,
        value: &T,
    ) -> ApplicationResult<()> {
        let raw = serde_json::to_string(value)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        self.set(namespace, key, &raw).await
    }
}

/// Namespaces are non-empty dot-separated segments of `[A-Za-z0-9_-]`.
pub fn validate_namespace(namespace: &str) -> ApplicationResult<()> {
    let valid = !namespace.is_empty()
        && namespace.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        });
    if valid {
        Ok(())
    } else {
        Err(ApplicationError::validation(format!(
            "invalid cache namespace '{namespace}'"
        )))
    }
}

pub fn validate_key(key: &str) -> ApplicationResult<()> {
    if key.is_empty() || key.chars().any(char::is_whitespace) {
        Err(ApplicationError::validation(format!("invalid cache key '{key}'")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_rules() {
        assert!(validate_namespace("sly").is_ok());
        assert!(validate_namespace("sly.article.list").is_ok());
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("sly..article").is_err());
        assert!(validate_namespace("sly.art icle").is_err());
    }

    #[test]
    fn key_rules() {
        assert!(validate_key("3_1_latest").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("a b").is_err());
    }
}
