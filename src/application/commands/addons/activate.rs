use super::{ADDON_CACHE_NAMESPACE, AddOnManager};
use crate::{
    application::{
        commands::ensure_capability,
        dto::Actor,
        error::ApplicationResult,
        queries::addons::same_version,
    },
    domain::package::{AddOnEvent, AddOnState},
};

impl AddOnManager {
    /// Activates an installed add-on. A changed version on disk is brought
    /// up to date first. Activating an active add-on is a no-op.
    pub async fn activate(&self, actor: &Actor, name: &str) -> ApplicationResult<()> {
        ensure_capability(actor, "addons", "manage")?;

        let state = self.require_installed(name).await?;
        if state.is_activated() {
            tracing::debug!(addon = %name, "add-on already active");
            return Ok(());
        }
        self.ensure_compatible(name).await?;
        self.ensure_requirements_active(name).await?;

        let mut state = if self.addons.needs_update(name).await? {
            self.update(actor, name).await?
        } else {
            state
        };

        self.hooks.announce(AddOnEvent::PreActivate { addon: name.to_string() });
        state.status = true;
        self.addons.store_state(name, &state).await?;

        tracing::info!(addon = %name, "add-on activated");
        self.hooks
            .committed(
                &[ADDON_CACHE_NAMESPACE],
                AddOnEvent::PostActivate { addon: name.to_string() },
            )
            .await
    }

    /// Records the version found on disk and republishes the assets.
    pub async fn update(&self, actor: &Actor, name: &str) -> ApplicationResult<AddOnState> {
        ensure_capability(actor, "addons", "manage")?;

        let mut state = self.require_installed(name).await?;
        let package = self.addons.packages().package(name).await?;
        let from = state.version.clone();
        let to = package.manifest.version.clone();
        if same_version(from.as_deref(), to.as_deref()) {
            return Ok(state);
        }

        self.hooks.announce(AddOnEvent::PreUpdate {
            addon: name.to_string(),
            from: from.clone(),
            to: to.clone(),
        });

        self.publish_assets(&package).await?;
        state.version = to.clone();
        self.addons.store_state(name, &state).await?;

        tracing::info!(addon = %name, ?from, ?to, "add-on updated");
        self.hooks
            .committed(
                &[ADDON_CACHE_NAMESPACE],
                AddOnEvent::PostUpdate {
                    addon: name.to_string(),
                    from,
                    to,
                },
            )
            .await?;
        Ok(state)
    }

    /// Refused while an activated add-on still requires this one.
    pub async fn deactivate(&self, actor: &Actor, name: &str) -> ApplicationResult<()> {
        ensure_capability(actor, "addons", "manage")?;

        let mut state = self.require_installed(name).await?;
        if !state.is_activated() {
            tracing::debug!(addon = %name, "add-on already inactive");
            return Ok(());
        }
        self.ensure_no_dependents(name, AddOnState::is_activated, "active")
            .await?;

        self.hooks.announce(AddOnEvent::PreDeactivate { addon: name.to_string() });
        state.status = false;
        self.addons.store_state(name, &state).await?;

        tracing::info!(addon = %name, "add-on deactivated");
        self.hooks
            .committed(
                &[ADDON_CACHE_NAMESPACE],
                AddOnEvent::PostDeactivate { addon: name.to_string() },
            )
            .await
    }
}
