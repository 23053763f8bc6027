use super::ArticleCommandService;
use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, SLICE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::ApplicationResult,
    },
    domain::article::{ArticleEvent, ArticleId},
};

pub struct CopyArticleCommand {
    pub id: i64,
    pub target: Option<i64>,
}

impl ArticleCommandService {
    /// Copies the latest content of every language into a new, offline
    /// article at the end of `target`. Start articles are copied as plain
    /// articles.
    pub async fn copy_article(
        &self,
        actor: &Actor,
        command: CopyArticleCommand,
    ) -> ApplicationResult<ArticleId> {
        ensure_capability(actor, "pages", "add")?;

        let id = ArticleId::new(command.id)?;
        let target = command.target.map(ArticleId::new).transpose()?;
        self.require_article(id, self.default_clang).await?;
        self.require_target_category(target).await?;

        let stamp = actor.stamp(self.clock.now());
        let copy = self.write_repo.copy(id, target, &stamp).await?;

        tracing::info!(source = %id, copy = %copy, target = ?target, "article copied");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE, SLICE_CACHE_NAMESPACE],
                ArticleEvent::ArticleCopied {
                    source: id,
                    copy,
                    target,
                },
            )
            .await?;
        Ok(copy)
    }
}
