use crate::domain::article::entity::{Article, ArticleContentUpdate, NewArticle};
use crate::domain::article::revision::RevisionSelector;
use crate::domain::article::value_objects::ArticleId;
use crate::domain::errors::DomainResult;
use crate::domain::language::ClangId;
use crate::domain::stamp::AuditStamp;
use async_trait::async_trait;

/// A set of rows whose positions are kept contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingScope {
    /// Categories below `parent`, ordered by `cat_position`.
    Categories { parent: Option<ArticleId> },
    /// Plain articles in `category`, ordered by `position`.
    Articles { category: Option<ArticleId> },
}

impl SiblingScope {
    pub fn of(article: &Article) -> Self {
        if article.startpage {
            Self::Categories {
                parent: article.parent,
            }
        } else {
            Self::Articles {
                category: article.parent,
            }
        }
    }
}

#[async_trait]
pub trait ArticleReadRepository: Send + Sync {
    /// Non-deleted row of one language and revision.
    async fn find(
        &self,
        id: ArticleId,
        clang: ClangId,
        revision: RevisionSelector,
    ) -> DomainResult<Option<Article>>;
    /// Latest revision regardless of the deleted flag.
    async fn find_including_deleted(
        &self,
        id: ArticleId,
        clang: ClangId,
    ) -> DomainResult<Option<Article>>;
    async fn children_categories(
        &self,
        parent: Option<ArticleId>,
        clang: ClangId,
    ) -> DomainResult<Vec<Article>>;
    async fn articles_in_category(
        &self,
        category: Option<ArticleId>,
        clang: ClangId,
    ) -> DomainResult<Vec<Article>>;
    async fn revisions(&self, id: ArticleId, clang: ClangId) -> DomainResult<Vec<Article>>;
    async fn count_siblings(&self, scope: SiblingScope) -> DomainResult<i64>;
}

/// Every write runs in a single transaction and touches all languages.
#[async_trait]
pub trait ArticleWriteRepository: Send + Sync {
    /// Allocates a new id and inserts one row per configured language.
    async fn insert(&self, article: NewArticle) -> DomainResult<ArticleId>;
    async fn update_content(
        &self,
        id: ArticleId,
        clang: ClangId,
        update: ArticleContentUpdate,
    ) -> DomainResult<()>;
    /// Moves the row to `position` within its current sibling set.
    async fn reposition(
        &self,
        id: ArticleId,
        position: i64,
        stamp: &AuditStamp,
    ) -> DomainResult<()>;
    /// Re-parents the row (appending it to the target's siblings) and
    /// rewrites the paths of the row and its whole subtree.
    async fn move_to(
        &self,
        id: ArticleId,
        target: Option<ArticleId>,
        stamp: &AuditStamp,
    ) -> DomainResult<()>;
    async fn soft_delete(&self, id: ArticleId, stamp: &AuditStamp) -> DomainResult<()>;
    /// Undeletes the row and appends it to its sibling set.
    async fn restore(&self, id: ArticleId, stamp: &AuditStamp) -> DomainResult<()>;
    /// Copies the latest revision of every language, slices included, into a
    /// new plain article appended to `target`.
    async fn copy(
        &self,
        id: ArticleId,
        target: Option<ArticleId>,
        stamp: &AuditStamp,
    ) -> DomainResult<ArticleId>;
    /// Creates a new latest revision from the current latest one, slices
    /// included. Returns the new revision number.
    async fn touch(&self, id: ArticleId, clang: ClangId, stamp: &AuditStamp) -> DomainResult<i64>;
    /// `true` marks the latest revision as the single online one; `false`
    /// takes every revision offline.
    async fn set_online(
        &self,
        id: ArticleId,
        clang: ClangId,
        online: bool,
        stamp: &AuditStamp,
    ) -> DomainResult<()>;
}
