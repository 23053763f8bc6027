use crate::domain::article::ArticleId;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::language::ClangId;
use crate::domain::stamp::AuditStamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Key/value content of one module instance.
pub type SliceValues = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleSliceId(pub i64);

impl ArticleSliceId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("article slice id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<ArticleSliceId> for i64 {
    fn from(value: ArticleSliceId) -> Self {
        value.0
    }
}

impl fmt::Display for ArticleSliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotName(String);

impl SlotName {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty()
            || !value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::Validation(format!("invalid slot name '{value}'")));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies the content of one article revision in one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevisionKey {
    pub article_id: ArticleId,
    pub clang: ClangId,
    pub revision: i64,
}

impl RevisionKey {
    pub fn new(article_id: ArticleId, clang: ClangId, revision: i64) -> Self {
        Self {
            article_id,
            clang,
            revision,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slice {
    pub id: i64,
    pub module: String,
    pub values: SliceValues,
}

impl Slice {
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn serialize_values(values: &SliceValues) -> DomainResult<String> {
        serde_json::to_string(values)
            .map_err(|err| DomainError::Validation(format!("slice values: {err}")))
    }

    pub fn deserialize_values(raw: &str) -> DomainResult<SliceValues> {
        if raw.trim().is_empty() {
            return Ok(SliceValues::new());
        }
        serde_json::from_str(raw)
            .map_err(|err| DomainError::Persistence(format!("corrupt slice values: {err}")))
    }
}

/// Places a [`Slice`] at a 0-based position inside a slot of an article revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSlice {
    pub id: ArticleSliceId,
    pub key: RevisionKey,
    pub slot: SlotName,
    pub position: i64,
    pub slice: Slice,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone)]
pub struct NewArticleSlice {
    pub key: RevisionKey,
    pub slot: SlotName,
    /// 0-based; `None` or too large values append, negative values insert first.
    pub position: Option<i64>,
    pub module: String,
    pub values: SliceValues,
    pub stamp: AuditStamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_survive_serialization() {
        let mut values = SliceValues::new();
        values.insert("headline".into(), json!("Hello"));
        values.insert("images".into(), json!([1, 2]));
        let raw = Slice::serialize_values(&values).unwrap();
        assert_eq!(Slice::deserialize_values(&raw).unwrap(), values);
    }

    #[test]
    fn empty_payload_is_an_empty_map() {
        assert!(Slice::deserialize_values("").unwrap().is_empty());
        assert!(Slice::deserialize_values("{not json").is_err());
    }

    #[test]
    fn slot_names_are_identifiers() {
        assert!(SlotName::new("main").is_ok());
        assert!(SlotName::new("side-bar_2").is_ok());
        assert!(SlotName::new("").is_err());
        assert!(SlotName::new("has space").is_err());
    }
}
