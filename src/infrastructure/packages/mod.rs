// src/infrastructure/packages/mod.rs
mod assets;
mod source;
mod sql;

pub use assets::FilesystemAssetPublisher;
pub use source::FilesystemPackageSource;
pub use sql::{SqliteScriptRunner, split_statements};
