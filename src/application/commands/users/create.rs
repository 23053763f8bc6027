use super::UserCommandService;
use crate::{
    application::{
        commands::ensure_capability,
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
        ports::events::Event,
    },
    domain::user::{Login, NewUser, Role, User, UserAttributes},
};
use serde_json::json;

pub struct CreateUserCommand {
    pub login: String,
    pub password: String,
    pub name: Option<String>,
    pub role: Role,
    pub attributes: UserAttributes,
}

impl UserCommandService {
    pub async fn create_user(
        &self,
        actor: &Actor,
        command: CreateUserCommand,
    ) -> ApplicationResult<User> {
        ensure_capability(actor, "users", "add")?;

        let login = Login::new(command.login)?;
        if self.user_repo.find_by_login(&login).await?.is_some() {
            return Err(ApplicationError::conflict(format!(
                "login '{login}' is already taken"
            )));
        }

        let password_hash = self.hash_password(&command.password).await?;
        let mut new_user = NewUser::new(
            login,
            password_hash,
            command.role,
            actor.stamp(self.clock.now()),
        );
        if let Some(name) = command.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            new_user.name = name;
        }
        new_user.attributes = command.attributes;

        let user = self.user_repo.insert(new_user).await?;

        tracing::info!(user_id = %user.id, login = %user.login, role = %user.role, "user created");
        self.events.notify(Event::new(
            "SLY_USER_ADDED",
            json!({ "id": user.id.0, "login": user.login.as_str() }),
        ));
        Ok(user)
    }
}
