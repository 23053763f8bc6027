use std::{path::PathBuf, sync::Arc};

use crate::{
    application::{
        commands::MEDIA_CACHE_NAMESPACE,
        error::{ApplicationError, ApplicationResult},
        ports::{cache::Cache, media_storage::MediaStorage},
    },
    domain::media::{
        MediaCategory, MediaCategoryId, MediaCategoryRepository, Medium, MediumId,
        MediumRepository,
    },
};

pub struct MediaQueryService {
    category_repo: Arc<dyn MediaCategoryRepository>,
    medium_repo: Arc<dyn MediumRepository>,
    storage: Arc<dyn MediaStorage>,
    cache: Arc<dyn Cache>,
}

impl MediaQueryService {
    pub fn new(
        category_repo: Arc<dyn MediaCategoryRepository>,
        medium_repo: Arc<dyn MediumRepository>,
        storage: Arc<dyn MediaStorage>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            category_repo,
            medium_repo,
            storage,
            cache,
        }
    }

    pub async fn find_media_category(&self, id: i64) -> ApplicationResult<MediaCategory> {
        let id = MediaCategoryId::new(id)?;
        self.category_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("media category {id} not found")))
    }

    /// Child categories of `parent`, `None` for the top level.
    pub async fn media_categories(&self, parent: Option<i64>) -> ApplicationResult<Vec<MediaCategory>> {
        let parent = parent.map(MediaCategoryId::new).transpose()?;
        Ok(self.category_repo.children(parent).await?)
    }

    pub async fn find_medium(&self, id: i64) -> ApplicationResult<Medium> {
        let id = MediumId::new(id)?;
        let key = id.to_string();
        if let Some(hit) = self
            .cache
            .get_json::<Medium>(MEDIA_CACHE_NAMESPACE, &key)
            .await?
        {
            return Ok(hit);
        }

        let medium = self
            .medium_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("medium {id} not found")))?;
        self.cache
            .set_json(MEDIA_CACHE_NAMESPACE, &key, &medium)
            .await?;
        Ok(medium)
    }

    pub async fn find_medium_by_filename(&self, filename: &str) -> ApplicationResult<Option<Medium>> {
        Ok(self.medium_repo.find_by_filename(filename).await?)
    }

    pub async fn media_in_category(&self, category: Option<i64>) -> ApplicationResult<Vec<Medium>> {
        let category = category.map(MediaCategoryId::new).transpose()?;
        Ok(self.medium_repo.list_in_category(category).await?)
    }

    /// Location of the medium's file in the pool.
    pub fn file_path(&self, medium: &Medium) -> PathBuf {
        self.storage.path_of(&medium.filename)
    }
}
