use std::sync::Arc;

use crate::{
    application::{
        commands::ChangeHooks,
        error::{ApplicationError, ApplicationResult},
        ports::{packages::{AssetPublisher, DiscoveredPackage}, sql::SqlScriptRunner},
        queries::addons::AddOnService,
    },
    domain::package::AddOnState,
};

/// Installs, activates, deactivates and uninstalls add-ons while keeping
/// every requirement edge satisfied.
pub struct AddOnManager {
    pub(super) addons: Arc<AddOnService>,
    pub(super) sql: Arc<dyn SqlScriptRunner>,
    pub(super) assets: Arc<dyn AssetPublisher>,
    pub(super) hooks: ChangeHooks,
}

impl AddOnManager {
    pub(crate) fn new(
        addons: Arc<AddOnService>,
        sql: Arc<dyn SqlScriptRunner>,
        assets: Arc<dyn AssetPublisher>,
        hooks: ChangeHooks,
    ) -> Self {
        Self {
            addons,
            sql,
            assets,
            hooks,
        }
    }

    pub(super) async fn require_installed(&self, name: &str) -> ApplicationResult<AddOnState> {
        let state = self.addons.state(name).await?;
        if !state.is_installed() {
            return Err(ApplicationError::dependency(
                "addon.not_installed",
                format!("add-on '{name}' is not installed"),
            ));
        }
        Ok(state)
    }

    pub(super) async fn ensure_compatible(&self, name: &str) -> ApplicationResult<()> {
        let packages = self.addons.packages();
        if packages.is_compatible(name).await? {
            Ok(())
        } else {
            Err(ApplicationError::dependency(
                "addon.incompatible",
                format!(
                    "add-on '{name}' does not support core version {}",
                    packages.core_version()
                ),
            ))
        }
    }

    /// Every direct requirement must be installed and activated.
    pub(super) async fn ensure_requirements_active(&self, name: &str) -> ApplicationResult<()> {
        let packages = self.addons.packages();
        for requirement in packages.requirements(name, false).await? {
            let available = packages.exists(&requirement).await?
                && self.addons.is_activated(&requirement).await?;
            if !available {
                return Err(ApplicationError::dependency(
                    "addon.missing_requirement",
                    format!("add-on '{name}' requires '{requirement}', which is not activated"),
                ));
            }
        }
        Ok(())
    }

    /// Fails when any (transitive) dependent matches `blocking`.
    pub(super) async fn ensure_no_dependents(
        &self,
        name: &str,
        blocking: fn(&AddOnState) -> bool,
        what: &str,
    ) -> ApplicationResult<()> {
        let packages = self.addons.packages();
        for dependent in packages.dependencies(name, true).await? {
            if blocking(&self.addons.state(&dependent).await?) {
                return Err(ApplicationError::dependency(
                    "addon.has_dependents",
                    format!("add-on '{dependent}' requires '{name}' and is still {what}"),
                ));
            }
        }
        Ok(())
    }

    pub(super) async fn run_sql_file(
        &self,
        package: &DiscoveredPackage,
        relative: Option<&str>,
    ) -> ApplicationResult<()> {
        let Some(relative) = relative else {
            return Ok(());
        };
        let path = package.file(relative);
        let script = tokio::fs::read_to_string(&path).await.map_err(|err| {
            ApplicationError::infrastructure(format!("cannot read {}: {err}", path.display()))
        })?;
        let statements = self.sql.run_script(&script).await?;
        tracing::info!(addon = %package.name(), file = %relative, statements, "sql dump applied");
        Ok(())
    }

    pub(super) async fn publish_assets(&self, package: &DiscoveredPackage) -> ApplicationResult<()> {
        let Some(relative) = package.manifest.extra.sallycms.assets.as_deref() else {
            return Ok(());
        };
        let source = package.file(relative);
        if !source.is_dir() {
            tracing::warn!(addon = %package.name(), dir = %source.display(), "assets directory missing");
            return Ok(());
        }
        let files = self.assets.publish(package.name(), &source).await?;
        tracing::debug!(addon = %package.name(), files, "assets published");
        Ok(())
    }
}
