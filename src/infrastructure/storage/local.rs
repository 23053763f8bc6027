use crate::application::{ApplicationResult, error::ApplicationError, ports::media_storage::MediaStorage};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Media pool in a local directory; files are stored flat by filename.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn ensure_flat(filename: &str) -> ApplicationResult<()> {
    if filename.is_empty()
        || filename.contains(['/', '\\'])
        || filename == "."
        || filename == ".."
    {
        return Err(ApplicationError::validation(format!("invalid media filename '{filename}'")));
    }
    Ok(())
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn exists(&self, filename: &str) -> ApplicationResult<bool> {
        ensure_flat(filename)?;
        tokio::fs::try_exists(self.path_of(filename))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }

    async fn store(&self, source: &Path, filename: &str) -> ApplicationResult<u64> {
        ensure_flat(filename)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        tokio::fs::copy(source, self.path_of(filename))
            .await
            .map_err(|err| {
                ApplicationError::infrastructure(format!("cannot store {}: {err}", source.display()))
            })
    }

    async fn remove(&self, filename: &str) -> ApplicationResult<()> {
        ensure_flat(filename)?;
        match tokio::fs::remove_file(self.path_of(filename)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(filename, "media file already gone");
                Ok(())
            }
            Err(err) => Err(ApplicationError::infrastructure(err.to_string())),
        }
    }

    fn path_of(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_removes_files() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = tmp.path().join("upload.txt");
        std::fs::write(&upload, "hello").unwrap();

        let storage = LocalMediaStorage::new(tmp.path().join("pool"));
        assert_eq!(storage.store(&upload, "hello.txt").await.unwrap(), 5);
        assert!(storage.exists("hello.txt").await.unwrap());

        storage.remove("hello.txt").await.unwrap();
        storage.remove("hello.txt").await.unwrap();
        assert!(!storage.exists("hello.txt").await.unwrap());
    }

    #[tokio::test]
    async fn refuses_paths() {
        let storage = LocalMediaStorage::new("pool");
        assert!(storage.exists("../etc/passwd").await.is_err());
    }
}
