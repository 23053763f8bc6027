use crate::domain::article::{ArticleId, ArticlePath};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::stamp::AuditStamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaCategoryId(pub i64);

impl MediaCategoryId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("media category id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }

    pub fn from_column(value: i64) -> DomainResult<Option<Self>> {
        if value == 0 { Ok(None) } else { Self::new(value).map(Some) }
    }

    pub fn column(id: Option<Self>) -> i64 {
        id.map(|id| id.0).unwrap_or(0)
    }
}

impl fmt::Display for MediaCategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediumId(pub i64);

impl MediumId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("medium id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl fmt::Display for MediumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaCategory {
    pub id: MediaCategoryId,
    pub name: String,
    pub parent: Option<MediaCategoryId>,
    /// Same `|1|4|` notation as the article tree.
    pub path: ArticlePath,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl MediaCategory {
    pub fn child_path(&self) -> ArticlePath {
        self.path.child(ArticleId(self.id.0))
    }
}

#[derive(Debug, Clone)]
pub struct NewMediaCategory {
    pub name: String,
    pub parent: Option<MediaCategoryId>,
    pub path: ArticlePath,
    pub stamp: AuditStamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medium {
    pub id: MediumId,
    pub category: Option<MediaCategoryId>,
    pub filename: String,
    pub original_name: String,
    pub mimetype: String,
    pub filesize: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl Medium {
    pub fn is_image(&self) -> bool {
        self.mimetype.starts_with("image/")
    }
}

#[derive(Debug, Clone)]
pub struct NewMedium {
    pub category: Option<MediaCategoryId>,
    pub filename: String,
    pub original_name: String,
    pub mimetype: String,
    pub filesize: i64,
    pub title: String,
    pub stamp: AuditStamp,
}
