use std::sync::Arc;

use crate::{
    application::{
        commands::SLICE_CACHE_NAMESPACE,
        error::{ApplicationError, ApplicationResult},
        ports::cache::Cache,
    },
    domain::{
        article::{ArticleId, ArticleReadRepository, RevisionSelector},
        language::ClangId,
        slice::{ArticleSlice, ArticleSliceId, ArticleSliceRepository, RevisionKey, SlotName},
    },
};

pub struct ListSlicesQuery {
    pub article_id: i64,
    pub clang: i64,
    pub revision: RevisionSelector,
    /// Restrict to one slot; all slots otherwise.
    pub slot: Option<String>,
}

pub struct SliceQueryService {
    slice_repo: Arc<dyn ArticleSliceRepository>,
    article_repo: Arc<dyn ArticleReadRepository>,
    cache: Arc<dyn Cache>,
}

impl SliceQueryService {
    pub fn new(
        slice_repo: Arc<dyn ArticleSliceRepository>,
        article_repo: Arc<dyn ArticleReadRepository>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            slice_repo,
            article_repo,
            cache,
        }
    }

    pub async fn find_slice(&self, id: i64) -> ApplicationResult<ArticleSlice> {
        let id = ArticleSliceId::new(id)?;
        self.slice_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("slice {id} not found")))
    }

    /// Slices of the selected revision, ordered by slot and position.
    pub async fn list_slices(&self, query: ListSlicesQuery) -> ApplicationResult<Vec<ArticleSlice>> {
        let article_id = ArticleId::new(query.article_id)?;
        let clang = ClangId::new(query.clang)?;
        let slot = query.slot.map(SlotName::new).transpose()?;

        let article = self
            .article_repo
            .find(article_id, clang, query.revision)
            .await?
            .ok_or_else(|| {
                ApplicationError::not_found(format!(
                    "article {article_id} ({}) not found in language {clang}",
                    query.revision
                ))
            })?;
        let key = RevisionKey::new(article_id, clang, article.revision);

        let cache_key = format!(
            "{article_id}_{clang}_{}_{}",
            article.revision,
            slot.as_ref().map(SlotName::as_str).unwrap_or("*")
        );
        if let Some(hit) = self
            .cache
            .get_json::<Vec<ArticleSlice>>(SLICE_CACHE_NAMESPACE, &cache_key)
            .await?
        {
            return Ok(hit);
        }

        let slices = self.slice_repo.list(key, slot.as_ref()).await?;
        self.cache
            .set_json(SLICE_CACHE_NAMESPACE, &cache_key, &slices)
            .await?;
        Ok(slices)
    }
}
