// src/application/commands/articles/delete.rs
use super::ArticleCommandService;
use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::ApplicationResult,
    },
    domain::{
        article::{ArticleEvent, ArticleId},
        errors::DomainError,
    },
};

pub struct DeleteArticleCommand {
    pub id: i64,
}

impl ArticleCommandService {
    pub async fn delete_article(
        &self,
        actor: &Actor,
        command: DeleteArticleCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "pages", "delete")?;

        let id = ArticleId::new(command.id)?;
        let article = self.require_article(id, self.default_clang).await?;
        if article.startpage {
            return Err(DomainError::rule(
                "article.is_startarticle",
                format!("article {id} is a start article; delete its category instead"),
            )
            .into());
        }

        let stamp = actor.stamp(self.clock.now());
        self.write_repo.soft_delete(id, &stamp).await?;

        tracing::info!(article = %id, actor = %actor.login, "article deleted");
        self.hooks
            .committed(&[ARTICLE_CACHE_NAMESPACE], ArticleEvent::ArticleDeleted { id })
            .await
    }
}
