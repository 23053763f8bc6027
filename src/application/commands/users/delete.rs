use super::UserCommandService;
use crate::{
    application::{
        commands::ensure_capability,
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
        ports::events::Event,
    },
};
use serde_json::json;

impl UserCommandService {
    pub async fn delete_user(&self, actor: &Actor, id: i64) -> ApplicationResult<()> {
        ensure_capability(actor, "users", "delete")?;

        let user = self.require_user(id).await?;
        if actor.id == Some(user.id) {
            return Err(ApplicationError::validation("you cannot delete yourself"));
        }

        self.user_repo.delete(user.id).await?;

        tracing::info!(user_id = %user.id, login = %user.login, "user deleted");
        self.events.notify(Event::new(
            "SLY_USER_DELETED",
            json!({ "id": user.id.0, "login": user.login.as_str() }),
        ));
        Ok(())
    }
}
