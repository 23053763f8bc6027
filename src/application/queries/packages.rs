use std::{collections::BTreeMap, sync::Arc};

use parking_lot::RwLock;

use crate::{
    application::{
        error::{ApplicationError, ApplicationResult},
        ports::packages::{DiscoveredPackage, PackageSource},
    },
    domain::package::{DependencyGraph, LoadOrder, Manifest, Version, Walk},
};

/// Snapshot of the packages found on disk.
#[derive(Debug, Default)]
pub struct PackageRegistry {
    packages: BTreeMap<String, DiscoveredPackage>,
    graph: DependencyGraph,
}

impl PackageRegistry {
    pub fn new(found: Vec<DiscoveredPackage>) -> Self {
        let mut registry = Self::default();
        for package in found {
            let name = package.name().to_string();
            if registry.packages.contains_key(&name) {
                tracing::warn!(package = %name, dir = %package.directory.display(), "duplicate package ignored");
                continue;
            }
            registry
                .graph
                .add_package(name.clone(), package.manifest.package_requirements());
            registry.packages.insert(name, package);
        }
        registry
    }

    pub fn get(&self, name: &str) -> Option<&DiscoveredPackage> {
        self.packages.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.packages.keys().cloned().collect()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}

/// Package metadata and the requirement graph between packages.
pub struct PackageService {
    source: Arc<dyn PackageSource>,
    core_version: Version,
    registry: RwLock<Option<Arc<PackageRegistry>>>,
}

impl PackageService {
    pub fn new(source: Arc<dyn PackageSource>, core_version: Version) -> Self {
        Self {
            source,
            core_version,
            registry: RwLock::new(None),
        }
    }

    pub fn core_version(&self) -> &Version {
        &self.core_version
    }

    /// Scans lazily; the snapshot stays until [`PackageService::refresh`].
    pub async fn registry(&self) -> ApplicationResult<Arc<PackageRegistry>> {
        let cached = self.registry.read().clone();
        match cached {
            Some(registry) => Ok(registry),
            None => self.refresh().await,
        }
    }

    pub async fn refresh(&self) -> ApplicationResult<Arc<PackageRegistry>> {
        let found = self.source.scan().await?;
        let registry = Arc::new(PackageRegistry::new(found));
        tracing::debug!(packages = registry.packages.len(), "package registry refreshed");
        *self.registry.write() = Some(Arc::clone(&registry));
        Ok(registry)
    }

    /// Sorted package names.
    pub async fn packages(&self) -> ApplicationResult<Vec<String>> {
        Ok(self.registry().await?.names())
    }

    pub async fn exists(&self, name: &str) -> ApplicationResult<bool> {
        Ok(self.registry().await?.get(name).is_some())
    }

    pub async fn package(&self, name: &str) -> ApplicationResult<DiscoveredPackage> {
        self.registry()
            .await?
            .get(name)
            .cloned()
            .ok_or_else(|| ApplicationError::not_found(format!("package '{name}' not found")))
    }

    pub async fn manifest(&self, name: &str) -> ApplicationResult<Manifest> {
        Ok(self.package(name).await?.manifest)
    }

    pub async fn version(&self, name: &str) -> ApplicationResult<Option<String>> {
        Ok(self.manifest(name).await?.version)
    }

    pub async fn author(&self, name: &str) -> ApplicationResult<Option<String>> {
        Ok(self.manifest(name).await?.author().map(str::to_string))
    }

    pub async fn homepage(&self, name: &str) -> ApplicationResult<Option<String>> {
        Ok(self.manifest(name).await?.homepage)
    }

    pub async fn parent(&self, name: &str) -> ApplicationResult<Option<String>> {
        Ok(self.manifest(name).await?.extra.sallycms.parent)
    }

    /// Packages `name` requires; with `recursive`, the whole closure.
    pub async fn requirements(&self, name: &str, recursive: bool) -> ApplicationResult<Vec<String>> {
        let registry = self.registry().await?;
        let walk = registry.graph().requirements(name, recursive);
        Ok(report_cycle(name, "requirements", walk))
    }

    /// Packages requiring `name`; with `recursive`, transitively.
    pub async fn dependencies(&self, name: &str, recursive: bool) -> ApplicationResult<Vec<String>> {
        let registry = self.registry().await?;
        let walk = registry.graph().dependents(name, recursive);
        Ok(report_cycle(name, "dependencies", walk))
    }

    pub async fn is_compatible(&self, name: &str) -> ApplicationResult<bool> {
        let manifest = self.manifest(name).await?;
        match manifest.is_compatible_with(&self.core_version) {
            Ok(compatible) => Ok(compatible),
            Err(err) => {
                tracing::warn!(package = %name, error = %err, "unreadable core constraint");
                Ok(false)
            }
        }
    }

    /// Requirement-first order of `subset`.
    pub async fn load_order(&self, subset: &[String]) -> ApplicationResult<LoadOrder> {
        let registry = self.registry().await?;
        let order = registry
            .graph()
            .load_order(subset.iter().map(String::as_str));
        if !order.cyclic.is_empty() {
            tracing::warn!(packages = ?order.cyclic, "requirement cycle between packages");
        }
        Ok(order)
    }
}

fn report_cycle(name: &str, direction: &str, walk: Walk) -> Vec<String> {
    if walk.cyclic {
        tracing::warn!(package = %name, direction, "requirement cycle detected");
    }
    walk.packages
}
