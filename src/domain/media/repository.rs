use crate::domain::errors::DomainResult;
use crate::domain::media::entity::{
    MediaCategory, MediaCategoryId, Medium, MediumId, NewMediaCategory, NewMedium,
};
use crate::domain::stamp::AuditStamp;
use async_trait::async_trait;

#[async_trait]
pub trait MediaCategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: MediaCategoryId) -> DomainResult<Option<MediaCategory>>;
    async fn children(&self, parent: Option<MediaCategoryId>) -> DomainResult<Vec<MediaCategory>>;
    async fn insert(&self, category: NewMediaCategory) -> DomainResult<MediaCategory>;
    async fn rename(
        &self,
        id: MediaCategoryId,
        name: &str,
        stamp: &AuditStamp,
    ) -> DomainResult<MediaCategory>;
    async fn delete(&self, id: MediaCategoryId) -> DomainResult<()>;
}

#[async_trait]
pub trait MediumRepository: Send + Sync {
    async fn find_by_id(&self, id: MediumId) -> DomainResult<Option<Medium>>;
    async fn find_by_filename(&self, filename: &str) -> DomainResult<Option<Medium>>;
    async fn list_in_category(&self, category: Option<MediaCategoryId>) -> DomainResult<Vec<Medium>>;
    async fn count_in_category(&self, category: MediaCategoryId) -> DomainResult<i64>;
    async fn insert(&self, medium: NewMedium) -> DomainResult<Medium>;
    async fn update(
        &self,
        id: MediumId,
        title: &str,
        category: Option<MediaCategoryId>,
        stamp: &AuditStamp,
    ) -> DomainResult<Medium>;
    async fn delete(&self, id: MediumId) -> DomainResult<()>;
}
