// src/application/commands/articles/mod.rs
mod add;
mod copy;
mod delete;
mod edit;
mod move_article;
mod restore;
mod service;
mod status;
mod touch;

pub use add::AddArticleCommand;
pub use copy::CopyArticleCommand;
pub use delete::DeleteArticleCommand;
pub use edit::EditArticleCommand;
pub use move_article::MoveArticleCommand;
pub use restore::RestoreArticleCommand;
pub use service::ArticleCommandService;
pub use status::ChangeArticleStatusCommand;
pub use touch::TouchArticleCommand;
