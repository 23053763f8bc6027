use super::UserCommandService;
use crate::{
    application::{
        commands::ensure_capability,
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
    },
    domain::user::{User, UserUpdate},
};

pub struct ChangePasswordCommand {
    pub user_id: i64,
    /// Required when users change their own password.
    pub current_password: Option<String>,
    pub new_password: String,
}

impl UserCommandService {
    pub async fn change_password(
        &self,
        actor: &Actor,
        command: ChangePasswordCommand,
    ) -> ApplicationResult<()> {
        let user = self.require_user(command.user_id).await?;

        self.verify_change_password_self(actor, &user, command.current_password.as_deref())
            .await?;

        let password_hash = self.hash_password(&command.new_password).await?;
        let update = UserUpdate::new(user.id, actor.stamp(self.clock.now()))
            .with_password_hash(password_hash);
        self.user_repo.update(update).await?;

        tracing::info!(user_id = %user.id, "password changed");
        Ok(())
    }

    async fn verify_change_password_self(
        &self,
        actor: &Actor,
        user: &User,
        current_password: Option<&str>,
    ) -> ApplicationResult<()> {
        if actor.id != Some(user.id) {
            return ensure_capability(actor, "users", "edit");
        }

        let current = current_password
            .ok_or_else(|| ApplicationError::validation("current password is required"))?;
        self.password_hasher
            .verify(current, user.password_hash.as_str())
            .await
    }
}
