use super::UserCommandService;
use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::{
        stamp::AuditStamp,
        user::{Login, User, UserUpdate},
    },
};

pub struct LoginCommand {
    pub login: String,
    pub password: String,
}

impl UserCommandService {
    /// Checks credentials. Every attempt on an existing account records
    /// `last_try_at`, successful or not.
    pub async fn login(&self, command: LoginCommand) -> ApplicationResult<User> {
        let login = Login::new(command.login)
            .map_err(|_| ApplicationError::unauthorized("invalid credentials"))?;
        let user = self
            .user_repo
            .find_by_login(&login)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("invalid credentials"))?;

        if !user.is_active {
            return Err(ApplicationError::forbidden("account is disabled"));
        }

        let now = self.clock.now();
        let verified = self
            .password_hasher
            .verify(&command.password, user.password_hash.as_str())
            .await;

        let update = UserUpdate::new(user.id, AuditStamp::new(now, user.login.as_str()))
            .with_last_try_at(now);
        let user = self.user_repo.update(update).await?;

        match verified {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "login succeeded");
                Ok(user)
            }
            Err(ApplicationError::Unauthorized(_)) => {
                tracing::warn!(user_id = %user.id, "login failed");
                Err(ApplicationError::unauthorized("invalid credentials"))
            }
            Err(err) => {
                tracing::error!(user_id = %user.id, error = %err, "password verification failed");
                Err(err)
            }
        }
    }
}
