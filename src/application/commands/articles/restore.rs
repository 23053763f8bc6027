use super::ArticleCommandService;
use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{ArticleEvent, ArticleId},
        errors::DomainError,
    },
};

pub struct RestoreArticleCommand {
    pub id: i64,
}

impl ArticleCommandService {
    /// Brings a soft-deleted plain article back, appended to its category.
    pub async fn restore_article(
        &self,
        actor: &Actor,
        command: RestoreArticleCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "pages", "delete")?;

        let id = ArticleId::new(command.id)?;
        let article = self
            .read_repo
            .find_including_deleted(id, self.default_clang)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;

        if !article.deleted {
            return Err(ApplicationError::conflict(format!("article {id} is not deleted")));
        }
        if article.startpage {
            return Err(DomainError::rule(
                "article.is_startarticle",
                "deleted categories cannot be restored",
            )
            .into());
        }
        if self.require_target_category(article.parent).await.is_err() {
            return Err(DomainError::rule(
                "article.category_gone",
                format!("the category of article {id} no longer exists"),
            )
            .into());
        }

        let stamp = actor.stamp(self.clock.now());
        self.write_repo.restore(id, &stamp).await?;

        tracing::info!(article = %id, actor = %actor.login, "article restored");
        self.hooks
            .committed(&[ARTICLE_CACHE_NAMESPACE], ArticleEvent::ArticleRestored { id })
            .await
    }
}
