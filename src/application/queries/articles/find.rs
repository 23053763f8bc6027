use super::ArticleQueryService;
use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::article::{Article, ArticleId, RevisionSelector},
};

pub struct FindArticleQuery {
    pub id: i64,
    /// Defaults to the configured default language.
    pub clang: Option<i64>,
    pub revision: RevisionSelector,
}

impl FindArticleQuery {
    pub fn latest(id: i64) -> Self {
        Self {
            id,
            clang: None,
            revision: RevisionSelector::Latest,
        }
    }
}

impl ArticleQueryService {
    pub async fn find_article(&self, query: FindArticleQuery) -> ApplicationResult<Option<Article>> {
        let id = ArticleId::new(query.id)?;
        let clang = self.clang_or_default(query.clang)?;
        let selector = query.revision;
        let key = format!("{id}_{clang}_{selector}");

        self.memoize("row", &key, || async move {
            Ok(self.read_repo.find(id, clang, selector).await?)
        })
        .await
    }

    pub async fn get_article(&self, query: FindArticleQuery) -> ApplicationResult<Article> {
        let id = query.id;
        self.find_article(query)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))
    }

    /// Every revision of an article in one language, newest first. Not cached.
    pub async fn revisions(&self, id: i64, clang: Option<i64>) -> ApplicationResult<Vec<Article>> {
        let id = ArticleId::new(id)?;
        let clang = self.clang_or_default(clang)?;
        Ok(self.read_repo.revisions(id, clang).await?)
    }
}
