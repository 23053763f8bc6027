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
    /// Only inactive add-ons without installed dependents can be uninstalled.
    pub async fn uninstall(&self, actor: &Actor, name: &str) -> ApplicationResult<()> {
        ensure_capability(actor, "addons", "manage")?;

        let state = self.require_installed(name).await?;
        if state.is_activated() {
            return Err(ApplicationError::dependency(
                "addon.still_active",
                format!("add-on '{name}' must be deactivated first"),
            ));
        }
        self.ensure_no_dependents(name, AddOnState::is_installed, "installed")
            .await?;

        self.hooks.announce(AddOnEvent::PreUninstall { addon: name.to_string() });

        // the package may have vanished from disk; state is dropped regardless
        match self.addons.packages().package(name).await {
            Ok(package) => {
                self.run_sql_file(&package, package.manifest.extra.sallycms.uninstall_sql.as_deref())
                    .await?;
            }
            Err(ApplicationError::NotFound(_)) => {
                tracing::warn!(addon = %name, "uninstalling an add-on that is no longer on disk");
            }
            Err(err) => return Err(err),
        }
        self.assets.withdraw(name).await?;
        self.addons.forget(name).await?;

        tracing::info!(addon = %name, "add-on uninstalled");
        self.hooks
            .committed(
                &[ADDON_CACHE_NAMESPACE],
                AddOnEvent::PostUninstall { addon: name.to_string() },
            )
            .await
    }
}
