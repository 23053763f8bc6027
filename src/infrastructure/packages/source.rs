use crate::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::packages::{DiscoveredPackage, PackageSource},
};
use crate::domain::package::Manifest;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MANIFEST: &str = "composer.json";

/// Finds `<root>/<vendor>/<name>/composer.json` below each configured root.
#[derive(Debug, Clone)]
pub struct FilesystemPackageSource {
    roots: Vec<PathBuf>,
}

impl FilesystemPackageSource {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }
}

fn read_manifest(path: &Path) -> Option<Manifest> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(file = %path.display(), error = %err, "unreadable package manifest");
            return None;
        }
    };
    match Manifest::from_json(&raw) {
        Ok(manifest) => Some(manifest),
        Err(err) => {
            tracing::warn!(file = %path.display(), error = %err, "invalid package manifest");
            None
        }
    }
}

fn scan_roots(roots: &[PathBuf]) -> Vec<DiscoveredPackage> {
    let mut found = Vec::new();
    for root in roots {
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "package root does not exist");
            continue;
        }
        let manifests = WalkDir::new(root)
            .min_depth(3)
            .max_depth(3)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable package directory");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST);

        for entry in manifests {
            let Some(manifest) = read_manifest(entry.path()) else {
                continue;
            };
            let Some(directory) = entry.path().parent() else {
                continue;
            };
            found.push(DiscoveredPackage {
                manifest,
                directory: directory.to_path_buf(),
            });
        }
    }
    found
}

#[async_trait]
impl PackageSource for FilesystemPackageSource {
    async fn scan(&self) -> ApplicationResult<Vec<DiscoveredPackage>> {
        let roots = self.roots.clone();
        let found = tokio::task::spawn_blocking(move || scan_roots(&roots))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        tracing::debug!(packages = found.len(), "package roots scanned");
        Ok(found)
    }
}
