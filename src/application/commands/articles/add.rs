// src/application/commands/articles/add.rs
use super::ArticleCommandService;
use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::ApplicationResult,
    },
    domain::article::{ArticleEvent, ArticleId, ArticleName, ArticleType, NewArticle},
};

pub struct AddArticleCommand {
    pub category: Option<i64>,
    pub name: String,
    pub position: Option<i64>,
    pub article_type: Option<String>,
}

impl AddArticleCommand {
    pub fn builder() -> AddArticleCommandBuilder {
        AddArticleCommandBuilder::default()
    }
}

#[derive(Default)]
pub struct AddArticleCommandBuilder {
    category: Option<i64>,
    name: Option<String>,
    position: Option<i64>,
    article_type: Option<String>,
}

impl AddArticleCommandBuilder {
    pub fn category(mut self, category: i64) -> Self {
        self.category = Some(category);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn article_type(mut self, article_type: impl Into<String>) -> Self {
        self.article_type = Some(article_type.into());
        self
    }

    pub fn build(self) -> Result<AddArticleCommand, &'static str> {
        Ok(AddArticleCommand {
            category: self.category,
            name: self.name.ok_or("name is required")?,
            position: self.position,
            article_type: self.article_type,
        })
    }
}

impl ArticleCommandService {
    pub async fn add_article(
        &self,
        actor: &Actor,
        command: AddArticleCommand,
    ) -> ApplicationResult<ArticleId> {
        ensure_capability(actor, "pages", "add")?;

        let category = command.category.map(ArticleId::new).transpose()?;
        self.require_target_category(category).await?;

        let name = ArticleName::new(command.name)?;
        let article_type = command
            .article_type
            .map(ArticleType::new)
            .transpose()?
            .unwrap_or_default();
        let stamp = actor.stamp(self.clock.now());

        let new_article = NewArticle::article(category, name, stamp)
            .with_position(command.position)
            .with_type(article_type);
        let id = self.write_repo.insert(new_article).await?;

        tracing::info!(article = %id, category = ?category, actor = %actor.login, "article added");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE],
                ArticleEvent::ArticleAdded { id, category },
            )
            .await?;
        Ok(id)
    }
}
