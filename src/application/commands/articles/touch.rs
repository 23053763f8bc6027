use super::ArticleCommandService;
use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, SLICE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::ApplicationResult,
    },
    domain::{
        article::{ArticleEvent, ArticleId},
        language::ClangId,
    },
};

pub struct TouchArticleCommand {
    pub id: i64,
    pub clang: i64,
}

impl ArticleCommandService {
    /// Starts a new revision based on the latest one and returns its number.
    /// The online revision stays untouched until the article is published.
    pub async fn touch_article(
        &self,
        actor: &Actor,
        command: TouchArticleCommand,
    ) -> ApplicationResult<i64> {
        ensure_capability(actor, "pages", "edit")?;

        let id = ArticleId::new(command.id)?;
        let clang = ClangId::new(command.clang)?;
        self.require_article(id, clang).await?;

        let stamp = actor.stamp(self.clock.now());
        let revision = self.write_repo.touch(id, clang, &stamp).await?;

        tracing::info!(article = %id, clang = %clang, revision, "article revision created");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE, SLICE_CACHE_NAMESPACE],
                ArticleEvent::ArticleTouched { id, clang, revision },
            )
            .await?;
        Ok(revision)
    }
}
