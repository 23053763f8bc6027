use crate::application::ports::events::{Event, EventDispatcher};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Synchronous dispatcher. Listeners run in registration order on the
/// notifying task; every event is also recorded.
#[derive(Default)]
pub struct InMemoryEventDispatcher {
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
    recorded: RwLock<Vec<Event>>,
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, listener: impl Fn(&Event) + Send + Sync + 'static) {
        self.listeners
            .write()
            .entry(name.into())
            .or_default()
            .push(Arc::new(listener));
    }

    pub fn names(&self) -> Vec<String> {
        self.recorded.read().iter().map(|event| event.name.clone()).collect()
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn notify(&self, event: Event) {
        // clone the list so listeners may register further listeners
        let listeners = self.listeners.read().get(&event.name).cloned().unwrap_or_default();
        tracing::debug!(event = %event.name, listeners = listeners.len(), "event");
        for listener in &listeners {
            listener(&event);
        }
        self.recorded.write().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn listeners_only_see_their_event() {
        let dispatcher = InMemoryEventDispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        dispatcher.register("SLY_ART_ADDED", move |event| {
            assert_eq!(event.subject["id"], 3);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.notify(Event::new("SLY_ART_ADDED", json!({ "id": 3 })));
        dispatcher.notify(Event::new("SLY_CAT_ADDED", json!({ "id": 4 })));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.names(), vec!["SLY_ART_ADDED", "SLY_CAT_ADDED"]);
    }
}
