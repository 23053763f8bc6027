use crate::domain::errors::DomainResult;
use crate::domain::language::entity::{ClangId, Language, NewLanguage};
use async_trait::async_trait;

#[async_trait]
pub trait LanguageRepository: Send + Sync {
    async fn list(&self) -> DomainResult<Vec<Language>>;
    async fn find_by_id(&self, id: ClangId) -> DomainResult<Option<Language>>;
    /// Inserts the language and, when `copy_from` is given, duplicates every
    /// non-deleted article row and its slices of that language in the same
    /// transaction. Copies are stored offline.
    async fn insert(
        &self,
        language: NewLanguage,
        copy_from: Option<ClangId>,
    ) -> DomainResult<Language>;
    async fn update(&self, language: &Language) -> DomainResult<Language>;
    /// Removes the language together with its article rows and article slices.
    async fn delete(&self, id: ClangId) -> DomainResult<()>;
}
