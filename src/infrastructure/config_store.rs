use crate::application::{ApplicationResult, error::ApplicationError, ports::config_store::ConfigStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Project configuration kept as one JSON document. When the store is file
/// backed every change is written to disk before the call returns.
pub struct JsonConfigStore {
    file: Option<PathBuf>,
    root: Mutex<Value>,
    /// Held from mutation until the file is replaced, so snapshots reach
    /// disk in the order they were taken.
    writer: tokio::sync::Mutex<()>,
}

fn segments(path: &str) -> ApplicationResult<Vec<&str>> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(ApplicationError::validation(format!("invalid config path '{path}'")));
    }
    Ok(parts)
}

/// Turns scalar nodes into empty objects so a nested path can be written.
fn object_of(node: &mut Value) -> ApplicationResult<&mut Map<String, Value>> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    node.as_object_mut()
        .ok_or_else(|| ApplicationError::infrastructure("config node is not an object"))
}

impl JsonConfigStore {
    pub fn in_memory() -> Self {
        Self {
            file: None,
            root: Mutex::new(Value::Object(Map::new())),
            writer: tokio::sync::Mutex::new(()),
        }
    }

    /// Loads `file`, starting empty when it does not exist yet.
    pub async fn open(file: impl Into<PathBuf>) -> ApplicationResult<Self> {
        let file = file.into();
        let root = match tokio::fs::read_to_string(&file).await {
            Ok(raw) => serde_json::from_str(&raw).map_err(|err| {
                ApplicationError::infrastructure(format!("{} is not valid JSON: {err}", file.display()))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Value::Object(Map::new()),
            Err(err) => {
                return Err(ApplicationError::infrastructure(format!(
                    "cannot read {}: {err}",
                    file.display()
                )));
            }
        };
        Ok(Self {
            file: Some(file),
            root: Mutex::new(root),
            writer: tokio::sync::Mutex::new(()),
        })
    }

    /// Replaces the file through a sibling temp file so readers never see a
    /// partial document.
    async fn persist(&self, snapshot: Value) -> ApplicationResult<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        if let Some(dir) = file.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(&snapshot)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let staged = file.with_extension("json.tmp");
        tokio::fs::write(&staged, raw)
            .await
            .map_err(|err| ApplicationError::infrastructure(format!("cannot write {}: {err}", staged.display())))?;
        tokio::fs::rename(&staged, file)
            .await
            .map_err(|err| ApplicationError::infrastructure(format!("cannot replace {}: {err}", file.display())))
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn get(&self, path: &str) -> ApplicationResult<Option<Value>> {
        let parts = segments(path)?;
        let root = self.root.lock();
        let mut node = &*root;
        for part in parts {
            match node.get(part) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok(Some(node.clone()))
    }

    async fn set(&self, path: &str, value: Value) -> ApplicationResult<()> {
        let parts = segments(path)?;
        let _writer = self.writer.lock().await;
        let snapshot = {
            let mut root = self.root.lock();
            let mut node = &mut *root;
            let Some((last, parents)) = parts.split_last() else {
                return Err(ApplicationError::validation("empty config path"));
            };
            for part in parents {
                node = object_of(node)?
                    .entry(part.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
            }
            object_of(node)?.insert(last.to_string(), value);
            root.clone()
        };
        self.persist(snapshot).await
    }

    async fn remove(&self, path: &str) -> ApplicationResult<()> {
        let parts = segments(path)?;
        let _writer = self.writer.lock().await;
        let snapshot = {
            let mut root = self.root.lock();
            let Some((last, parents)) = parts.split_last() else {
                return Ok(());
            };
            let mut node = &mut *root;
            for part in parents {
                match node.get_mut(*part) {
                    Some(child) => node = child,
                    None => return Ok(()),
                }
            }
            match node.as_object_mut() {
                Some(map) if map.remove(*last).is_some() => {}
                _ => return Ok(()),
            }
            root.clone()
        };
        self.persist(snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn nested_paths_create_intermediate_objects() {
        let store = JsonConfigStore::in_memory();
        store.set("addons/acme/gallery/install", json!(true)).await.unwrap();
        store.set("addons/acme/gallery/version", json!("1.0")).await.unwrap();

        assert_eq!(
            store.get("addons/acme/gallery").await.unwrap(),
            Some(json!({ "install": true, "version": "1.0" }))
        );
        assert_eq!(store.get("addons/acme/slider").await.unwrap(), None);

        store.remove("addons/acme/gallery").await.unwrap();
        assert_eq!(store.get("addons/acme").await.unwrap(), Some(json!({})));
        assert!(store.get("addons//x").await.is_err());
    }

    #[tokio::test]
    async fn file_backed_store_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("config/project.json");

        let store = JsonConfigStore::open(&file).await.unwrap();
        store.set("setup", json!(false)).await.unwrap();

        let reopened = JsonConfigStore::open(&file).await.unwrap();
        assert_eq!(reopened.get("setup").await.unwrap(), Some(json!(false)));
    }

    #[tokio::test]
    async fn concurrent_writes_all_reach_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("project.json");
        let store = std::sync::Arc::new(JsonConfigStore::open(&file).await.unwrap());

        let writers: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.set(&format!("keys/k{i}"), json!(i)).await })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let reopened = JsonConfigStore::open(&file).await.unwrap();
        let keys = reopened.get("keys").await.unwrap().unwrap();
        assert_eq!(keys.as_object().unwrap().len(), 16);
        assert_eq!(keys["k7"], json!(7));
        assert!(!file.with_extension("json.tmp").exists());
    }
}
