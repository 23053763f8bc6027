pub mod entity;
pub mod repository;

pub use entity::{ArticleSlice, ArticleSliceId, NewArticleSlice, RevisionKey, Slice, SliceValues, SlotName};
pub use repository::ArticleSliceRepository;
