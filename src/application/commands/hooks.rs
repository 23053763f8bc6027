use std::sync::Arc;

use crate::application::{
    error::ApplicationResult,
    ports::{
        cache::Cache,
        events::{Event, EventDispatcher},
    },
};

pub const ARTICLE_CACHE_NAMESPACE: &str = "sly.article";
pub const SLICE_CACHE_NAMESPACE: &str = "sly.slice";
pub const MEDIA_CACHE_NAMESPACE: &str = "sly.medium";

/// Post-commit duties shared by the write services: drop memoized reads and
/// tell listeners what happened.
#[derive(Clone)]
pub(crate) struct ChangeHooks {
    cache: Arc<dyn Cache>,
    events: Arc<dyn EventDispatcher>,
}

impl ChangeHooks {
    pub(crate) fn new(cache: Arc<dyn Cache>, events: Arc<dyn EventDispatcher>) -> Self {
        Self { cache, events }
    }

    pub(crate) async fn committed(
        &self,
        namespaces: &[&str],
        event: impl Into<Event>,
    ) -> ApplicationResult<()> {
        for namespace in namespaces {
            self.cache.flush(namespace, true).await?;
        }
        self.events.notify(event.into());
        Ok(())
    }

    /// Announces an upcoming change; nothing is flushed.
    pub(crate) fn announce(&self, event: impl Into<Event>) {
        self.events.notify(event.into());
    }
}
