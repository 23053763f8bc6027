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

pub struct MoveArticleCommand {
    pub id: i64,
    pub target: Option<i64>,
}

impl ArticleCommandService {
    /// Moves a plain article to the end of another category.
    pub async fn move_article(
        &self,
        actor: &Actor,
        command: MoveArticleCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "pages", "move")?;

        let id = ArticleId::new(command.id)?;
        let target = command.target.map(ArticleId::new).transpose()?;
        let article = self.require_article(id, self.default_clang).await?;
        if article.startpage {
            return Err(DomainError::rule(
                "article.is_startarticle",
                format!("article {id} is a start article; move its category instead"),
            )
            .into());
        }
        self.require_target_category(target).await?;

        if article.parent == target {
            return Ok(());
        }

        let stamp = actor.stamp(self.clock.now());
        self.write_repo.move_to(id, target, &stamp).await?;

        tracing::info!(article = %id, target = ?target, actor = %actor.login, "article moved");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE],
                ArticleEvent::ArticleMoved { id, target },
            )
            .await
    }
}
