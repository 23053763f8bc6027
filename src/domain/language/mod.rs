pub mod entity;
pub mod repository;

pub use entity::{ClangId, Language, NewLanguage};
pub use repository::LanguageRepository;
