use crate::domain::stamp::AuditStamp;
use crate::domain::user::{Capability, Role, User, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// The user on whose behalf a command runs.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Option<UserId>,
    pub login: String,
    pub role: Role,
    pub capabilities: HashSet<Capability>,
}

impl Actor {
    /// Maintenance actor used by the CLI and setup routines.
    pub fn system() -> Self {
        Self {
            id: None,
            login: "system".into(),
            role: Role::Admin,
            capabilities: Role::Admin.default_capabilities(),
        }
    }

    pub fn has_capability(&self, resource: &str, action: &str) -> bool {
        self.role == Role::Admin
            || self
                .capabilities
                .iter()
                .any(|cap| cap.matches(resource, action))
    }

    pub fn stamp(&self, at: DateTime<Utc>) -> AuditStamp {
        AuditStamp::new(at, self.login.clone())
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: Some(user.id),
            login: user.login.as_str().to_string(),
            role: user.role,
            capabilities: user.capabilities(),
        }
    }
}
