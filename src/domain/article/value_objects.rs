use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArticleId(pub i64);

impl ArticleId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation(
                "article id must be positive".into(),
            ))
        } else {
            Ok(Self(id))
        }
    }

    /// Parent columns store `0` for the root.
    pub fn from_parent_column(value: i64) -> DomainResult<Option<Self>> {
        if value == 0 {
            Ok(None)
        } else {
            Self::new(value).map(Some)
        }
    }

    pub fn parent_column(parent: Option<Self>) -> i64 {
        parent.map(|id| id.0).unwrap_or(0)
    }
}

impl From<ArticleId> for i64 {
    fn from(value: ArticleId) -> Self {
        value.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleName(String);

impl ArticleName {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation("name cannot be empty".into()));
        }
        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "name must not exceed {MAX_NAME_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ArticleName> for String {
    fn from(value: ArticleName) -> Self {
        value.0
    }
}

/// Article type key, e.g. `default` or `news`. Empty means "no type".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleType(String);

impl ArticleType {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::Validation(format!(
                "invalid article type '{value}'"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Materialized ancestor chain, e.g. `|1|5|`. The root path is `|`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticlePath(String);

impl ArticlePath {
    pub fn root() -> Self {
        Self("|".into())
    }

    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let well_formed = value.starts_with('|')
            && value.ends_with('|')
            && value
                .trim_matches('|')
                .split('|')
                .filter(|s| !s.is_empty())
                .all(|s| s.parse::<i64>().map(|n| n > 0).unwrap_or(false))
            && !value.contains("||");
        if well_formed {
            Ok(Self(value))
        } else {
            Err(DomainError::Validation(format!("malformed path '{value}'")))
        }
    }

    /// Path of rows whose parent is `parent`, given this is the parent's path.
    pub fn child(&self, parent: ArticleId) -> Self {
        Self(format!("{}{}|", self.0, parent.0))
    }

    pub fn ancestors(&self) -> Vec<ArticleId> {
        self.0
            .split('|')
            .filter_map(|s| s.parse::<i64>().ok())
            .map(ArticleId)
            .collect()
    }

    pub fn contains(&self, id: ArticleId) -> bool {
        self.ancestors().contains(&id)
    }

    pub fn depth(&self) -> usize {
        self.ancestors().len()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ArticlePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for ArticlePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_path_appends_parent() {
        let root = ArticlePath::root();
        let level1 = root.child(ArticleId(1));
        let level2 = level1.child(ArticleId(5));
        assert_eq!(level1.as_str(), "|1|");
        assert_eq!(level2.as_str(), "|1|5|");
        assert_eq!(level2.ancestors(), vec![ArticleId(1), ArticleId(5)]);
        assert_eq!(level2.depth(), 2);
        assert!(level2.contains(ArticleId(5)));
        assert!(!level2.contains(ArticleId(15)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(ArticlePath::parse("|").is_ok());
        assert!(ArticlePath::parse("|3|4|").is_ok());
        assert!(ArticlePath::parse("3|4|").is_err());
        assert!(ArticlePath::parse("|3||4|").is_err());
        assert!(ArticlePath::parse("|a|").is_err());
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(ArticleName::new("  Home ").unwrap().as_str(), "Home");
        assert!(ArticleName::new("   ").is_err());
        assert!(ArticleName::new("x".repeat(256)).is_err());
    }

    #[test]
    fn parent_column_maps_root_to_zero() {
        assert_eq!(ArticleId::parent_column(None), 0);
        assert_eq!(ArticleId::from_parent_column(0).unwrap(), None);
        assert_eq!(
            ArticleId::from_parent_column(7).unwrap(),
            Some(ArticleId(7))
        );
    }
}
