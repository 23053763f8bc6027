// src/application/commands/capability.rs
use crate::application::{
    dto::Actor,
    error::{ApplicationError, ApplicationResult},
};

pub(crate) fn ensure_capability(actor: &Actor, resource: &str, action: &str) -> ApplicationResult<()> {
    if actor.has_capability(resource, action) {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(format!(
            "missing capability {resource}:{action}"
        )))
    }
}
