// src/domain/language/entity.rs
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content language id ("clang").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClangId(pub i64);

impl ClangId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("clang id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<ClangId> for i64 {
    fn from(value: ClangId) -> Self {
        value.0
    }
}

impl fmt::Display for ClangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: ClangId,
    pub name: String,
    pub locale: String,
}

#[derive(Debug, Clone)]
pub struct NewLanguage {
    pub name: String,
    pub locale: String,
}

impl NewLanguage {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let locale = locale.into();
        if name.trim().is_empty() {
            return Err(DomainError::Validation("language name cannot be empty".into()));
        }
        validate_locale(&locale)?;
        Ok(Self {
            name: name.trim().to_string(),
            locale,
        })
    }
}

/// Accepts `de`, `de_DE` and `de-DE` style locales.
pub fn validate_locale(locale: &str) -> DomainResult<()> {
    let mut parts = locale.split(['_', '-']);
    let lang_ok = parts
        .next()
        .map(|p| (2..=3).contains(&p.len()) && p.chars().all(|c| c.is_ascii_lowercase()))
        .unwrap_or(false);
    let region_ok = match parts.next() {
        None => true,
        Some(region) => region.len() == 2 && region.chars().all(|c| c.is_ascii_uppercase()),
    };
    if lang_ok && region_ok && parts.next().is_none() {
        Ok(())
    } else {
        Err(DomainError::Validation(format!("invalid locale '{locale}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_locales() {
        assert!(validate_locale("de").is_ok());
        assert!(validate_locale("de_DE").is_ok());
        assert!(validate_locale("en-GB").is_ok());
    }

    #[test]
    fn rejects_malformed_locales() {
        assert!(validate_locale("").is_err());
        assert!(validate_locale("DE_de").is_err());
        assert!(validate_locale("de_DE_x").is_err());
    }

    #[test]
    fn new_language_trims_name() {
        let lang = NewLanguage::new("  Deutsch ", "de_DE").unwrap();
        assert_eq!(lang.name, "Deutsch");
    }
}
