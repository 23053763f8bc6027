use std::sync::Arc;

use crate::{
    application::{
        error::{ApplicationError, ApplicationResult},
        ports::{events::EventDispatcher, security::PasswordHasher, time::Clock},
    },
    domain::user::{PasswordHash, User, UserId, UserRepository, value_objects::ensure_password_policy},
};

pub struct UserCommandService {
    pub(super) user_repo: Arc<dyn UserRepository>,
    pub(super) password_hasher: Arc<dyn PasswordHasher>,
    pub(super) events: Arc<dyn EventDispatcher>,
    pub(super) clock: Arc<dyn Clock>,
}

impl UserCommandService {
    pub(crate) fn new(
        user_repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        events: Arc<dyn EventDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            events,
            clock,
        }
    }

    pub(super) async fn require_user(&self, id: i64) -> ApplicationResult<User> {
        let id = UserId::new(id)?;
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("user {id} not found")))
    }

    pub(super) async fn hash_password(&self, password: &str) -> ApplicationResult<PasswordHash> {
        ensure_password_policy(password)?;
        let hashed = self.password_hasher.hash(password).await?;
        Ok(PasswordHash::new(hashed)?)
    }
}
