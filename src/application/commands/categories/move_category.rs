use super::CategoryCommandService;
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

pub struct MoveCategoryCommand {
    pub id: i64,
    /// `None` moves the category to the top level.
    pub target: Option<i64>,
}

impl CategoryCommandService {
    pub async fn move_category(
        &self,
        actor: &Actor,
        command: MoveCategoryCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "pages", "move")?;

        let id = ArticleId::new(command.id)?;
        let target = command.target.map(ArticleId::new).transpose()?;
        let category = self.require_category(id, self.default_clang).await?;

        if let Some(target_id) = target {
            let target_row = self.require_category(target_id, self.default_clang).await?;
            if category.is_self_or_ancestor_of(&target_row) {
                return Err(DomainError::rule(
                    "category.move_into_itself",
                    format!("category {id} cannot be moved into {target_id}"),
                )
                .into());
            }
        }

        if category.parent == target {
            tracing::debug!(category = %id, "category already below target");
            return Ok(());
        }

        let stamp = actor.stamp(self.clock.now());
        self.write_repo.move_to(id, target, &stamp).await?;

        tracing::info!(category = %id, target = ?target, actor = %actor.login, "category moved");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE],
                ArticleEvent::CategoryMoved { id, target },
            )
            .await
    }
}
