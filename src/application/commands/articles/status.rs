use super::ArticleCommandService;
use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::ApplicationResult,
    },
    domain::{
        article::{ArticleEvent, ArticleId},
        language::ClangId,
    },
};

pub struct ChangeArticleStatusCommand {
    pub id: i64,
    pub clang: i64,
    pub online: bool,
}

impl ArticleCommandService {
    pub async fn change_article_status(
        &self,
        actor: &Actor,
        command: ChangeArticleStatusCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "pages", "publish")?;

        let id = ArticleId::new(command.id)?;
        let clang = ClangId::new(command.clang)?;
        self.require_article(id, clang).await?;

        let stamp = actor.stamp(self.clock.now());
        self.write_repo
            .set_online(id, clang, command.online, &stamp)
            .await?;

        tracing::info!(article = %id, clang = %clang, online = command.online, "article status changed");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE],
                ArticleEvent::ArticleStatusChanged {
                    id,
                    clang,
                    online: command.online,
                },
            )
            .await
    }
}
