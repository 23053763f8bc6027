use super::CategoryCommandService;
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

pub struct ChangeCategoryStatusCommand {
    pub id: i64,
    pub clang: i64,
    pub online: bool,
}

impl CategoryCommandService {
    /// Publishes or hides the start article of a category in one language.
    pub async fn change_category_status(
        &self,
        actor: &Actor,
        command: ChangeCategoryStatusCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "pages", "publish")?;

        let id = ArticleId::new(command.id)?;
        let clang = ClangId::new(command.clang)?;
        self.require_category(id, clang).await?;

        let stamp = actor.stamp(self.clock.now());
        self.write_repo
            .set_online(id, clang, command.online, &stamp)
            .await?;

        tracing::info!(category = %id, clang = %clang, online = command.online, "category status changed");
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
