// src/application/commands/mod.rs
pub mod addons;
pub mod articles;
mod capability;
pub mod categories;
mod hooks;
pub mod languages;
pub mod media;
pub mod slices;
pub mod users;

pub(crate) use capability::ensure_capability;
pub(crate) use hooks::ChangeHooks;
pub use hooks::{ARTICLE_CACHE_NAMESPACE, MEDIA_CACHE_NAMESPACE, SLICE_CACHE_NAMESPACE};
