pub mod entity;
pub mod events;
pub mod repository;
pub mod revision;
pub mod tree;
pub mod value_objects;

pub use entity::{Article, ArticleContentUpdate, NewArticle};
pub use events::ArticleEvent;
pub use repository::{ArticleReadRepository, ArticleWriteRepository, SiblingScope};
pub use revision::RevisionSelector;
pub use value_objects::{ArticleId, ArticleName, ArticlePath, ArticleType};
