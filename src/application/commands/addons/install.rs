use super::{ADDON_CACHE_NAMESPACE, AddOnManager};
use crate::{
    application::{
        commands::ensure_capability,
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
    },
    domain::package::{AddOnEvent, AddOnState},
};

impl AddOnManager {
    /// Applies the install dump (when `install_dump` is set), publishes the
    /// assets and records the add-on as installed but inactive.
    pub async fn install(&self, actor: &Actor, name: &str, install_dump: bool) -> ApplicationResult<()> {
        ensure_capability(actor, "addons", "manage")?;

        let package = self.addons.packages().package(name).await?;
        if self.addons.is_installed(name).await? {
            return Err(ApplicationError::conflict(format!(
                "add-on '{name}' is already installed"
            )));
        }
        self.ensure_compatible(name).await?;
        self.ensure_requirements_active(name).await?;

        self.hooks.announce(AddOnEvent::PreInstall { addon: name.to_string() });

        if install_dump {
            self.run_sql_file(&package, package.manifest.extra.sallycms.install_sql.as_deref())
                .await?;
        }
        self.publish_assets(&package).await?;

        let state = AddOnState {
            install: true,
            status: false,
            version: package.manifest.version.clone(),
        };
        self.addons.store_state(name, &state).await?;

        tracing::info!(addon = %name, version = ?state.version, "add-on installed");
        self.hooks
            .committed(
                &[ADDON_CACHE_NAMESPACE],
                AddOnEvent::PostInstall { addon: name.to_string() },
            )
            .await
    }
}
