// src/domain/errors.rs
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    /// A business rule refused the operation. `code` is stable and meant for callers
    /// that need to branch on the reason (e.g. `category.not_empty`).
    #[error("{message}")]
    Rule { code: &'static str, message: String },
}

impl DomainError {
    pub fn rule(code: &'static str, message: impl Into<String>) -> Self {
        Self::Rule {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Persistence(_) => "persistence",
            Self::Rule { code, .. } => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_errors_expose_their_code() {
        let err = DomainError::rule("category.not_empty", "category 3 still has children");
        assert_eq!(err.code(), "category.not_empty");
        assert_eq!(err.to_string(), "category 3 still has children");
    }

    #[test]
    fn plain_variants_have_generic_codes() {
        assert_eq!(DomainError::NotFound("x".into()).code(), "not_found");
        assert_eq!(DomainError::Validation("x".into()).code(), "validation");
    }
}
