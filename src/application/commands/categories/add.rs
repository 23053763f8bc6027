use super::CategoryCommandService;
use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::ApplicationResult,
    },
    domain::article::{ArticleEvent, ArticleId, ArticleName, NewArticle},
};

pub struct AddCategoryCommand {
    pub parent: Option<i64>,
    pub name: String,
    /// 1-based; omitted or too large positions append, values below 1 insert first.
    pub position: Option<i64>,
}

impl CategoryCommandService {
    pub async fn add_category(
        &self,
        actor: &Actor,
        command: AddCategoryCommand,
    ) -> ApplicationResult<ArticleId> {
        ensure_capability(actor, "pages", "add")?;

        let parent = command.parent.map(ArticleId::new).transpose()?;
        if let Some(parent) = parent {
            self.require_category(parent, self.default_clang).await?;
        }
        let name = ArticleName::new(command.name)?;
        let stamp = actor.stamp(self.clock.now());

        let id = self
            .write_repo
            .insert(NewArticle::category(parent, name, stamp).with_position(command.position))
            .await?;

        tracing::info!(category = %id, parent = ?parent, actor = %actor.login, "category added");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE],
                ArticleEvent::CategoryAdded { id, parent },
            )
            .await?;
        Ok(id)
    }
}
