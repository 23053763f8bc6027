// src/application/commands/categories/mod.rs
mod add;
mod delete;
mod edit;
mod move_category;
mod service;
mod status;

pub use add::AddCategoryCommand;
pub use delete::DeleteCategoryCommand;
pub use edit::EditCategoryCommand;
pub use move_category::MoveCategoryCommand;
pub use service::CategoryCommandService;
pub use status::ChangeCategoryStatusCommand;
