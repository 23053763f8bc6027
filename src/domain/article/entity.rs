// src/domain/article/entity.rs
use crate::domain::article::value_objects::{ArticleId, ArticleName, ArticlePath, ArticleType};
use crate::domain::language::ClangId;
use crate::domain::stamp::AuditStamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the article table: a single revision of an article in one language.
/// Categories are articles with `startpage` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub clang: ClangId,
    pub revision: i64,
    pub parent: Option<ArticleId>,
    pub name: ArticleName,
    pub cat_name: String,
    pub cat_position: i64,
    pub position: i64,
    pub path: ArticlePath,
    pub startpage: bool,
    pub article_type: ArticleType,
    pub online: bool,
    pub latest: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl Article {
    pub fn is_category(&self) -> bool {
        self.startpage
    }

    /// The category this row lives in. A start article is its own category.
    pub fn category_id(&self) -> Option<ArticleId> {
        if self.startpage {
            Some(self.id)
        } else {
            self.parent
        }
    }

    /// Path that rows placed below this category carry.
    pub fn child_path(&self) -> ArticlePath {
        self.path.child(self.id)
    }

    /// Whether `other` is this row or sits anywhere below it in the tree.
    pub fn is_self_or_ancestor_of(&self, other: &Article) -> bool {
        other.id == self.id || other.path.contains(self.id)
    }
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub parent: Option<ArticleId>,
    pub name: ArticleName,
    pub startpage: bool,
    /// 1-based; `None` or too large values append, values below 1 insert first.
    pub position: Option<i64>,
    pub article_type: ArticleType,
    pub stamp: AuditStamp,
}

impl NewArticle {
    pub fn category(parent: Option<ArticleId>, name: ArticleName, stamp: AuditStamp) -> Self {
        Self {
            parent,
            name,
            startpage: true,
            position: None,
            article_type: ArticleType::default(),
            stamp,
        }
    }

    pub fn article(category: Option<ArticleId>, name: ArticleName, stamp: AuditStamp) -> Self {
        Self {
            parent: category,
            name,
            startpage: false,
            position: None,
            article_type: ArticleType::default(),
            stamp,
        }
    }

    pub fn with_position(mut self, position: Option<i64>) -> Self {
        self.position = position;
        self
    }

    pub fn with_type(mut self, article_type: ArticleType) -> Self {
        self.article_type = article_type;
        self
    }
}

/// Per-language content changes. Applied to every revision of the row.
#[derive(Debug, Clone)]
pub struct ArticleContentUpdate {
    pub name: Option<ArticleName>,
    pub cat_name: Option<ArticleName>,
    pub article_type: Option<ArticleType>,
    pub stamp: AuditStamp,
}

impl ArticleContentUpdate {
    pub fn new(stamp: AuditStamp) -> Self {
        Self {
            name: None,
            cat_name: None,
            article_type: None,
            stamp,
        }
    }

    pub fn with_name(mut self, name: ArticleName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_cat_name(mut self, name: ArticleName) -> Self {
        self.cat_name = Some(name);
        self
    }

    pub fn with_type(mut self, article_type: ArticleType) -> Self {
        self.article_type = Some(article_type);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.cat_name.is_none() && self.article_type.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(id: i64, parent: Option<i64>, path: &str, startpage: bool) -> Article {
        Article {
            id: ArticleId(id),
            clang: ClangId(1),
            revision: 0,
            parent: parent.map(ArticleId),
            name: ArticleName::new("name").unwrap(),
            cat_name: String::new(),
            cat_position: 1,
            position: 0,
            path: ArticlePath::parse(path).unwrap(),
            startpage,
            article_type: ArticleType::default(),
            online: false,
            latest: true,
            deleted: false,
            created_at: Utc::now(),
            created_by: "admin".into(),
            updated_at: Utc::now(),
            updated_by: "admin".into(),
        }
    }

    #[test]
    fn start_article_is_its_own_category() {
        let category = row(3, Some(1), "|1|", true);
        let article = row(4, Some(3), "|1|3|", false);
        assert_eq!(category.category_id(), Some(ArticleId(3)));
        assert_eq!(article.category_id(), Some(ArticleId(3)));
        assert_eq!(category.child_path().as_str(), "|1|3|");
    }

    #[test]
    fn ancestry_follows_the_path() {
        let top = row(1, None, "|", true);
        let nested = row(7, Some(3), "|1|3|", true);
        let sibling = row(2, None, "|", true);
        assert!(top.is_self_or_ancestor_of(&nested));
        assert!(top.is_self_or_ancestor_of(&top));
        assert!(!sibling.is_self_or_ancestor_of(&nested));
    }

    #[test]
    fn content_update_tracks_emptiness() {
        let stamp = AuditStamp::new(Utc::now(), "admin");
        let update = ArticleContentUpdate::new(stamp.clone());
        assert!(update.is_empty());
        let update = update.with_name(ArticleName::new("x").unwrap());
        assert!(!update.is_empty());
    }
}
