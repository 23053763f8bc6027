use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    application::{
        commands::ARTICLE_CACHE_NAMESPACE, error::ApplicationResult, ports::cache::Cache,
    },
    domain::{article::ArticleReadRepository, language::ClangId},
};

/// Reads of the article tree, memoized in the `sly.article` cache namespace.
pub struct ArticleQueryService {
    pub(super) read_repo: Arc<dyn ArticleReadRepository>,
    pub(super) cache: Arc<dyn Cache>,
    pub(super) default_clang: ClangId,
}

impl ArticleQueryService {
    pub fn new(
        read_repo: Arc<dyn ArticleReadRepository>,
        cache: Arc<dyn Cache>,
        default_clang: ClangId,
    ) -> Self {
        Self {
            read_repo,
            cache,
            default_clang,
        }
    }

    pub(super) fn clang_or_default(&self, clang: Option<i64>) -> ApplicationResult<ClangId> {
        match clang {
            Some(raw) => Ok(ClangId::new(raw)?),
            None => Ok(self.default_clang),
        }
    }

    /// Returns the cached value under `sly.article.<sub>` or loads and stores it.
    pub(super) async fn memoize<T, F, Fut>(
        &self,
        sub: &str,
        key: &str,
        load: F,
    ) -> ApplicationResult<T>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApplicationResult<T>>,
    {
        let namespace = format!("{ARTICLE_CACHE_NAMESPACE}.{sub}");
        if let Some(hit) = self.cache.get_json::<T>(&namespace, key).await? {
            tracing::debug!(%namespace, key, "article cache hit");
            return Ok(hit);
        }
        tracing::debug!(%namespace, key, "article cache miss");
        let value = load().await?;
        self.cache.set_json(&namespace, key, &value).await?;
        Ok(value)
    }
}
