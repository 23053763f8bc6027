use crate::domain::article::ArticleEvent;
use crate::domain::package::AddOnEvent;
use serde_json::Value;

/// A named notification with a JSON subject, e.g. `SLY_ART_ADDED`.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub subject: Value,
}

impl Event {
    pub fn new(name: impl Into<String>, subject: Value) -> Self {
        Self {
            name: name.into(),
            subject,
        }
    }
}

impl From<ArticleEvent> for Event {
    fn from(event: ArticleEvent) -> Self {
        let name = event.name();
        Self::new(name, serde_json::to_value(&event).unwrap_or(Value::Null))
    }
}

impl From<AddOnEvent> for Event {
    fn from(event: AddOnEvent) -> Self {
        let name = event.name();
        Self::new(name, serde_json::to_value(&event).unwrap_or(Value::Null))
    }
}

pub trait EventDispatcher: Send + Sync {
    fn notify(&self, event: Event);
}
