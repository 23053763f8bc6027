mod activate;
mod install;
mod order;
mod service;
mod uninstall;

pub use service::AddOnManager;

/// Cache namespace flushed after every lifecycle change.
pub const ADDON_CACHE_NAMESPACE: &str = "sly";
