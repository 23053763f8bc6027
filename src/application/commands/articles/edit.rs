use super::ArticleCommandService;
use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{ArticleContentUpdate, ArticleEvent, ArticleId, ArticleName, ArticleType},
        language::ClangId,
    },
};

pub struct EditArticleCommand {
    pub id: i64,
    pub clang: i64,
    pub name: Option<String>,
    pub article_type: Option<String>,
    pub position: Option<i64>,
}

impl ArticleCommandService {
    pub async fn edit_article(
        &self,
        actor: &Actor,
        command: EditArticleCommand,
    ) -> ApplicationResult<()> {
        ensure_capability(actor, "pages", "edit")?;

        let id = ArticleId::new(command.id)?;
        let clang = ClangId::new(command.clang)?;
        let article = self.require_article(id, clang).await?;
        if command.position.is_some() && article.startpage {
            return Err(ApplicationError::validation(
                "start articles are positioned through their category",
            ));
        }
        let stamp = actor.stamp(self.clock.now());

        let mut update = ArticleContentUpdate::new(stamp.clone());
        if let Some(name) = command.name {
            update = update.with_name(ArticleName::new(name)?);
        }
        if let Some(article_type) = command.article_type {
            update = update.with_type(ArticleType::new(article_type)?);
        }
        if !update.is_empty() {
            self.write_repo.update_content(id, clang, update).await?;
        }

        if let Some(position) = command.position
            && position != article.position
        {
            self.write_repo.reposition(id, position, &stamp).await?;
        }

        tracing::info!(article = %id, clang = %clang, actor = %actor.login, "article updated");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE],
                ArticleEvent::ArticleUpdated { id, clang },
            )
            .await
    }
}
