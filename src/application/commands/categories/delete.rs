use super::CategoryCommandService;
use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::ApplicationResult,
    },
    domain::{
        article::{ArticleEvent, ArticleId, SiblingScope},
        errors::DomainError,
    },
};

pub struct DeleteCategoryCommand {
    pub id: i64,
}

impl CategoryCommandService {
    /// Soft-deletes an empty category. Categories that still contain
    /// categories or articles are refused with `category.not_empty`.
    pub async fn delete_category(
        &self,
        actor: &Actor,
        command: DeleteCategoryCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "pages", "delete")?;

        let id = ArticleId::new(command.id)?;
        self.require_category(id, self.default_clang).await?;

        let child_categories = self
            .read_repo
            .count_siblings(SiblingScope::Categories { parent: Some(id) })
            .await?;
        let articles = self
            .read_repo
            .count_siblings(SiblingScope::Articles { category: Some(id) })
            .await?;
        if child_categories > 0 || articles > 0 {
            return Err(DomainError::rule(
                "category.not_empty",
                format!(
                    "category {id} still holds {child_categories} categories and {articles} articles"
                ),
            )
            .into());
        }

        let stamp = actor.stamp(self.clock.now());
        self.write_repo.soft_delete(id, &stamp).await?;

        tracing::info!(category = %id, actor = %actor.login, "category deleted");
        self.hooks
            .committed(&[ARTICLE_CACHE_NAMESPACE], ArticleEvent::CategoryDeleted { id })
            .await
    }
}
