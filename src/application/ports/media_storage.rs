use crate::application::ApplicationResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Where media pool files live.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn exists(&self, filename: &str) -> ApplicationResult<bool>;
    /// Copies `source` into the pool as `filename`, returning the byte size.
    async fn store(&self, source: &Path, filename: &str) -> ApplicationResult<u64>;
    async fn remove(&self, filename: &str) -> ApplicationResult<()>;
    fn path_of(&self, filename: &str) -> PathBuf;
}
