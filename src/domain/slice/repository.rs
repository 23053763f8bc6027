use crate::domain::errors::DomainResult;
use crate::domain::slice::entity::{
    ArticleSlice, ArticleSliceId, NewArticleSlice, RevisionKey, SliceValues, SlotName,
};
use crate::domain::stamp::AuditStamp;
use async_trait::async_trait;

#[async_trait]
pub trait ArticleSliceRepository: Send + Sync {
    async fn find_by_id(&self, id: ArticleSliceId) -> DomainResult<Option<ArticleSlice>>;
    /// Ordered by slot, then position.
    async fn list(
        &self,
        key: RevisionKey,
        slot: Option<&SlotName>,
    ) -> DomainResult<Vec<ArticleSlice>>;
    /// Inserts slice and placement, shifting followers in the slot.
    async fn insert(&self, slice: NewArticleSlice) -> DomainResult<ArticleSlice>;
    async fn update_values(
        &self,
        id: ArticleSliceId,
        values: SliceValues,
        stamp: &AuditStamp,
    ) -> DomainResult<ArticleSlice>;
    /// Removes placement and slice, closing the gap in the slot.
    async fn delete(&self, id: ArticleSliceId) -> DomainResult<()>;
    /// Swaps the placement with its neighbour at `position`.
    async fn swap(
        &self,
        id: ArticleSliceId,
        neighbour: ArticleSliceId,
        stamp: &AuditStamp,
    ) -> DomainResult<()>;
}
