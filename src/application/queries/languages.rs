use std::sync::Arc;

use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::language::{ClangId, Language, LanguageRepository},
};

pub struct LanguageQueryService {
    repo: Arc<dyn LanguageRepository>,
}

impl LanguageQueryService {
    pub fn new(repo: Arc<dyn LanguageRepository>) -> Self {
        Self { repo }
    }

    /// All languages ordered by id.
    pub async fn list_languages(&self) -> ApplicationResult<Vec<Language>> {
        Ok(self.repo.list().await?)
    }

    pub async fn find_language(&self, id: i64) -> ApplicationResult<Language> {
        let id = ClangId::new(id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("language {id} not found")))
    }
}
