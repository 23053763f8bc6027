use super::CategoryCommandService;
use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::ApplicationResult,
    },
    domain::{
        article::{ArticleContentUpdate, ArticleEvent, ArticleId, ArticleName},
        language::ClangId,
    },
};

pub struct EditCategoryCommand {
    pub id: i64,
    pub clang: i64,
    pub name: Option<String>,
    pub position: Option<i64>,
}

impl CategoryCommandService {
    pub async fn edit_category(
        &self,
        actor: &Actor,
        command: EditCategoryCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "pages", "edit")?;

        let id = ArticleId::new(command.id)?;
        let clang = ClangId::new(command.clang)?;
        let category = self.require_category(id, clang).await?;
        let stamp = actor.stamp(self.clock.now());

        if let Some(name) = command.name {
            let name = ArticleName::new(name)?;
            let update = ArticleContentUpdate::new(stamp.clone())
                .with_name(name.clone())
                .with_cat_name(name);
            self.write_repo.update_content(id, clang, update).await?;
        }

        if let Some(position) = command.position
            && position != category.cat_position
        {
            self.write_repo.reposition(id, position, &stamp).await?;
        }

        tracing::info!(category = %id, clang = %clang, actor = %actor.login, "category updated");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE],
                ArticleEvent::CategoryUpdated { id, clang },
            )
            .await
    }
}
