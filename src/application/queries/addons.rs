use std::sync::Arc;

use serde_json::Value;

use crate::{
    application::{
        dto::AddOnInfo,
        error::{ApplicationError, ApplicationResult},
        ports::config_store::ConfigStore,
        queries::packages::PackageService,
    },
    domain::package::{AddOnState, Version},
};

const STATE_ROOT: &str = "addons";

pub(crate) fn state_path(name: &str) -> String {
    format!("{STATE_ROOT}/{name}")
}

/// Lifecycle state of add-ons, read from the project configuration.
pub struct AddOnService {
    config: Arc<dyn ConfigStore>,
    packages: Arc<PackageService>,
}

impl AddOnService {
    pub fn new(config: Arc<dyn ConfigStore>, packages: Arc<PackageService>) -> Self {
        Self { config, packages }
    }

    pub fn packages(&self) -> &Arc<PackageService> {
        &self.packages
    }

    pub async fn state(&self, name: &str) -> ApplicationResult<AddOnState> {
        match self.config.get(&state_path(name)).await? {
            None => Ok(AddOnState::default()),
            Some(raw) => serde_json::from_value(raw).map_err(|err| {
                ApplicationError::infrastructure(format!("corrupt state for add-on '{name}': {err}"))
            }),
        }
    }

    pub(crate) async fn store_state(&self, name: &str, state: &AddOnState) -> ApplicationResult<()> {
        let value = serde_json::to_value(state)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        self.config.set(&state_path(name), value).await
    }

    pub(crate) async fn forget(&self, name: &str) -> ApplicationResult<()> {
        self.config.remove(&state_path(name)).await
    }

    pub async fn is_installed(&self, name: &str) -> ApplicationResult<bool> {
        Ok(self.state(name).await?.is_installed())
    }

    pub async fn is_activated(&self, name: &str) -> ApplicationResult<bool> {
        Ok(self.state(name).await?.is_activated())
    }

    /// Version recorded on the last install or update.
    pub async fn known_version(&self, name: &str) -> ApplicationResult<Option<String>> {
        Ok(self.state(name).await?.version)
    }

    /// Installed, and the version on disk differs from the recorded one.
    pub async fn needs_update(&self, name: &str) -> ApplicationResult<bool> {
        let state = self.state(name).await?;
        if !state.is_installed() {
            return Ok(false);
        }
        let on_disk = self.packages.version(name).await?;
        Ok(!same_version(state.version.as_deref(), on_disk.as_deref()))
    }

    /// Every add-on with stored state, present on disk or not.
    pub async fn known_addons(&self) -> ApplicationResult<Vec<(String, AddOnState)>> {
        let Some(Value::Object(vendors)) = self.config.get(STATE_ROOT).await? else {
            return Ok(Vec::new());
        };

        let mut known = Vec::new();
        for (vendor, entries) in vendors {
            let Value::Object(entries) = entries else {
                continue;
            };
            for (addon, raw) in entries {
                let name = format!("{vendor}/{addon}");
                match serde_json::from_value::<AddOnState>(raw) {
                    Ok(state) => known.push((name, state)),
                    Err(err) => tracing::warn!(addon = %name, error = %err, "skipping corrupt add-on state"),
                }
            }
        }
        known.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(known)
    }

    /// Installed add-ons that still exist on disk, sorted.
    pub async fn installed_addons(&self) -> ApplicationResult<Vec<String>> {
        self.filter_known(AddOnState::is_installed).await
    }

    /// Activated add-ons that still exist on disk, sorted.
    pub async fn activated_addons(&self) -> ApplicationResult<Vec<String>> {
        self.filter_known(AddOnState::is_activated).await
    }

    async fn filter_known(&self, keep: fn(&AddOnState) -> bool) -> ApplicationResult<Vec<String>> {
        let registry = self.packages.registry().await?;
        Ok(self
            .known_addons()
            .await?
            .into_iter()
            .filter(|(name, state)| keep(state) && registry.get(name).is_some())
            .map(|(name, _)| name)
            .collect())
    }

    pub async fn info(&self, name: &str) -> ApplicationResult<AddOnInfo> {
        let manifest = self.packages.manifest(name).await?;
        let state = self.state(name).await?;
        let needs_update = state.is_installed()
            && !same_version(state.version.as_deref(), manifest.version.as_deref());

        Ok(AddOnInfo {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            description: manifest.description.clone(),
            author: manifest.author().map(str::to_string),
            installed: state.is_installed(),
            activated: state.is_activated(),
            compatible: self.packages.is_compatible(name).await?,
            needs_update,
            requirements: self.packages.requirements(name, false).await?,
            dependents: self.packages.dependencies(name, false).await?,
        })
    }

    /// One entry per package found on disk.
    pub async fn list(&self) -> ApplicationResult<Vec<AddOnInfo>> {
        let mut infos = Vec::new();
        for name in self.packages.packages().await? {
            infos.push(self.info(&name).await?);
        }
        Ok(infos)
    }
}

/// Compares by version semantics when both sides parse, textually otherwise.
pub(crate) fn same_version(known: Option<&str>, on_disk: Option<&str>) -> bool {
    match (known, on_disk) {
        (Some(a), Some(b)) => match (Version::parse(a), Version::parse(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => a == b,
        },
        (None, None) => true,
        _ => false,
    }
}
