use crate::application::ApplicationResult;
use crate::domain::package::Manifest;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DiscoveredPackage {
    pub manifest: Manifest,
    pub directory: PathBuf,
}

impl DiscoveredPackage {
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn file(&self, relative: &str) -> PathBuf {
        self.directory.join(relative)
    }
}

/// Finds package manifests.
#[async_trait]
pub trait PackageSource: Send + Sync {
    async fn scan(&self) -> ApplicationResult<Vec<DiscoveredPackage>>;
}

/// Publishes and withdraws a package's public assets.
#[async_trait]
pub trait AssetPublisher: Send + Sync {
    async fn publish(&self, package: &str, source: &Path) -> ApplicationResult<u64>;
    async fn withdraw(&self, package: &str) -> ApplicationResult<()>;
}
