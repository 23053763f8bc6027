use super::AddOnManager;
use crate::application::{
    commands::ensure_capability, dto::Actor, error::ApplicationResult,
};

impl AddOnManager {
    /// Activated add-ons, each after the add-ons it requires.
    pub async fn load_order(&self) -> ApplicationResult<Vec<String>> {
        let activated = self.addons.activated_addons().await?;
        let order = self.addons.packages().load_order(&activated).await?;
        Ok(order.order)
    }

    /// Rescans the package directories and drops the state of add-ons that
    /// are gone. Returns the dropped names.
    pub async fn refresh(&self, actor: &Actor) -> ApplicationResult<Vec<String>> {
        ensure_capability(actor, "addons", "manage")?;

        let registry = self.addons.packages().refresh().await?;
        let mut dropped = Vec::new();
        for (name, _) in self.addons.known_addons().await? {
            if registry.get(&name).is_none() {
                self.addons.forget(&name).await?;
                tracing::info!(addon = %name, "dropped state of vanished add-on");
                dropped.push(name);
            }
        }
        Ok(dropped)
    }
}
