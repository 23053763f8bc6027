use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who changed a row and when. Every content table carries a create and an
/// update stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub at: DateTime<Utc>,
    pub by: String,
}

impl AuditStamp {
    pub fn new(at: DateTime<Utc>, by: impl Into<String>) -> Self {
        Self { at, by: by.into() }
    }
}
