use crate::application::ApplicationResult;
use async_trait::async_trait;

/// Executes SQL dumps shipped with packages.
#[async_trait]
pub trait SqlScriptRunner: Send + Sync {
    /// Runs every statement of `script` in one transaction and returns the
    /// number of statements executed.
    async fn run_script(&self, script: &str) -> ApplicationResult<usize>;
}
