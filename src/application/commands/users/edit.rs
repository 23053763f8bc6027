use super::UserCommandService;
use crate::{
    application::{
        commands::ensure_capability,
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
        ports::events::Event,
    },
    domain::user::{Role, User, UserAttributes, UserUpdate},
};
use serde_json::json;

#[derive(Default)]
pub struct EditUserCommand {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub role: Option<Role>,
    pub attributes: Option<UserAttributes>,
}

impl UserCommandService {
    pub async fn edit_user(&self, actor: &Actor, command: EditUserCommand) -> ApplicationResult<User> {
        let user = self.require_user(command.id).await?;
        let is_self = actor.id == Some(user.id);

        // users may edit their own profile, but not their own role or status
        if !is_self || command.role.is_some() || command.is_active.is_some() {
            ensure_capability(actor, "users", "edit")?;
        }
        if is_self && command.is_active == Some(false) {
            return Err(ApplicationError::validation("you cannot deactivate yourself"));
        }

        let mut update = UserUpdate::new(user.id, actor.stamp(self.clock.now()));
        if let Some(name) = command.name {
            update = update.with_name(name.trim());
        }
        if let Some(description) = command.description {
            update = update.with_description(description);
        }
        if let Some(is_active) = command.is_active {
            update = update.with_is_active(is_active);
        }
        if let Some(role) = command.role {
            update = update.with_role(role);
        }
        if let Some(attributes) = command.attributes {
            update = update.with_attributes(attributes);
        }

        let user = self.user_repo.update(update).await?;
        self.events.notify(Event::new(
            "SLY_USER_UPDATED",
            json!({ "id": user.id.0, "login": user.login.as_str() }),
        ));
        Ok(user)
    }
}
