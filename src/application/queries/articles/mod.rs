mod find;
mod service;
mod tree;

pub use find::FindArticleQuery;
pub use service::ArticleQueryService;
