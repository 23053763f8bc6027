use std::sync::Arc;

use crate::{
    application::{
        commands::ChangeHooks,
        error::{ApplicationError, ApplicationResult},
        ports::{media_storage::MediaStorage, time::Clock, util::SlugGenerator},
    },
    domain::media::{MediaCategory, MediaCategoryId, MediaCategoryRepository, MediumRepository},
};

pub struct MediaCommandService {
    pub(super) category_repo: Arc<dyn MediaCategoryRepository>,
    pub(super) medium_repo: Arc<dyn MediumRepository>,
    pub(super) storage: Arc<dyn MediaStorage>,
    pub(super) slugger: Arc<dyn SlugGenerator>,
    pub(super) hooks: ChangeHooks,
    pub(super) clock: Arc<dyn Clock>,
}

impl MediaCommandService {
    pub(crate) fn new(
        category_repo: Arc<dyn MediaCategoryRepository>,
        medium_repo: Arc<dyn MediumRepository>,
        storage: Arc<dyn MediaStorage>,
        slugger: Arc<dyn SlugGenerator>,
        hooks: ChangeHooks,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            category_repo,
            medium_repo,
            storage,
            slugger,
            hooks,
            clock,
        }
    }

    pub(super) async fn require_category(
        &self,
        id: MediaCategoryId,
    ) -> ApplicationResult<MediaCategory> {
        self.category_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("media category {id} not found")))
    }
}
