// src/infrastructure/repositories/mod.rs
mod error;
mod sqlite_article;
mod sqlite_language;
mod sqlite_media;
mod sqlite_slice;
mod sqlite_user;

pub use error::map_sqlx;
pub use sqlite_article::SqliteArticleRepository;
pub use sqlite_language::SqliteLanguageRepository;
pub use sqlite_media::{SqliteMediaCategoryRepository, SqliteMediumRepository};
pub use sqlite_slice::SqliteArticleSliceRepository;
pub use sqlite_user::SqliteUserRepository;
