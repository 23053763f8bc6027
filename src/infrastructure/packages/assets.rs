use crate::application::{
    ApplicationResult, error::ApplicationError, ports::packages::AssetPublisher,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copies package assets into `<root>/<vendor>/<name>`.
#[derive(Debug, Clone)]
pub struct FilesystemAssetPublisher {
    root: PathBuf,
}

impl FilesystemAssetPublisher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn target_of(&self, package: &str) -> PathBuf {
        self.root.join(package)
    }
}

fn copy_tree(source: &Path, target: &Path) -> std::io::Result<u64> {
    if target.exists() {
        std::fs::remove_dir_all(target)?;
    }
    std::fs::create_dir_all(target)?;

    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(std::io::Error::other)?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&destination)?;
        } else if entry.file_type().is_file() {
            std::fs::copy(entry.path(), &destination)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[async_trait]
impl AssetPublisher for FilesystemAssetPublisher {
    async fn publish(&self, package: &str, source: &Path) -> ApplicationResult<u64> {
        let source = source.to_path_buf();
        let target = self.target_of(package);
        tokio::task::spawn_blocking(move || copy_tree(&source, &target))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
            .map_err(|err| ApplicationError::infrastructure(format!("publishing assets failed: {err}")))
    }

    async fn withdraw(&self, package: &str) -> ApplicationResult<()> {
        match tokio::fs::remove_dir_all(self.target_of(package)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ApplicationError::infrastructure(format!(
                "withdrawing assets of {package} failed: {err}"
            ))),
        }
    }
}
