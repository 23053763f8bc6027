use super::ArticleQueryService;
use crate::{
    application::error::ApplicationResult,
    domain::article::{Article, ArticleId, RevisionSelector},
};

fn parent_key(parent: Option<ArticleId>) -> i64 {
    ArticleId::parent_column(parent)
}

impl ArticleQueryService {
    /// Categories directly below `parent` (`None` for the root), ordered by
    /// `cat_position`.
    pub async fn children_categories(
        &self,
        parent: Option<i64>,
        clang: Option<i64>,
    ) -> ApplicationResult<Vec<Article>> {
        let parent = parent.map(ArticleId::new).transpose()?;
        let clang = self.clang_or_default(clang)?;
        let key = format!("cats_{}_{clang}", parent_key(parent));

        self.memoize("list", &key, || async move {
            Ok(self.read_repo.children_categories(parent, clang).await?)
        })
        .await
    }

    /// Plain articles of a category, ordered by `position`.
    pub async fn articles_in_category(
        &self,
        category: Option<i64>,
        clang: Option<i64>,
    ) -> ApplicationResult<Vec<Article>> {
        let category = category.map(ArticleId::new).transpose()?;
        let clang = self.clang_or_default(clang)?;
        let key = format!("arts_{}_{clang}", parent_key(category));

        self.memoize("list", &key, || async move {
            Ok(self.read_repo.articles_in_category(category, clang).await?)
        })
        .await
    }

    /// Categories from the root down to the article, the article last.
    /// Ancestors that cannot be loaded are skipped.
    pub async fn breadcrumb(&self, id: i64, clang: Option<i64>) -> ApplicationResult<Vec<Article>> {
        let id = ArticleId::new(id)?;
        let clang = self.clang_or_default(clang)?;

        let Some(article) = self.read_repo.find(id, clang, RevisionSelector::Latest).await? else {
            return Ok(Vec::new());
        };

        let mut trail = Vec::with_capacity(article.path.depth() + 1);
        for ancestor in article.path.ancestors() {
            match self
                .read_repo
                .find(ancestor, clang, RevisionSelector::Latest)
                .await?
            {
                Some(category) => trail.push(category),
                None => tracing::warn!(article = %id, %ancestor, "broken ancestor in article path"),
            }
        }
        trail.push(article);
        Ok(trail)
    }
}
