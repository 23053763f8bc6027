use crate::{
    application::{
        commands::ensure_capability,
        dto::{Actor, UserDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::user::{Login, UserId, UserRepository},
};
use std::sync::Arc;

pub struct UserQueryService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserQueryService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Users may always read their own record.
    pub async fn find_user(&self, actor: &Actor, id: i64) -> ApplicationResult<UserDto> {
        let id = UserId::new(id)?;
        if actor.id != Some(id) {
            ensure_capability(actor, "users", "view")?;
        }
        self.user_repo
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ApplicationError::not_found("user not found"))
    }

    pub async fn find_by_login(&self, actor: &Actor, login: &str) -> ApplicationResult<Option<UserDto>> {
        ensure_capability(actor, "users", "view")?;
        let login = Login::new(login)?;
        Ok(self.user_repo.find_by_login(&login).await?.map(Into::into))
    }

    pub async fn list_users(&self, actor: &Actor) -> ApplicationResult<Vec<UserDto>> {
        ensure_capability(actor, "users", "view")?;
        let users = self.user_repo.list().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }
}
