pub mod entity;
pub mod filename;
pub mod repository;

pub use entity::{MediaCategory, MediaCategoryId, Medium, MediumId, NewMediaCategory, NewMedium};
pub use repository::{MediaCategoryRepository, MediumRepository};
