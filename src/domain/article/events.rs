use crate::domain::article::value_objects::ArticleId;
use crate::domain::language::ClangId;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArticleEvent {
    ArticleAdded { id: ArticleId, category: Option<ArticleId> },
    ArticleUpdated { id: ArticleId, clang: ClangId },
    ArticleDeleted { id: ArticleId },
    ArticleRestored { id: ArticleId },
    ArticleMoved { id: ArticleId, target: Option<ArticleId> },
    ArticleCopied { source: ArticleId, copy: ArticleId, target: Option<ArticleId> },
    ArticleTouched { id: ArticleId, clang: ClangId, revision: i64 },
    ArticleStatusChanged { id: ArticleId, clang: ClangId, online: bool },
    CategoryAdded { id: ArticleId, parent: Option<ArticleId> },
    CategoryUpdated { id: ArticleId, clang: ClangId },
    CategoryDeleted { id: ArticleId },
    CategoryMoved { id: ArticleId, target: Option<ArticleId> },
}

impl ArticleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ArticleAdded { .. } => "SLY_ART_ADDED",
            Self::ArticleUpdated { .. } => "SLY_ART_UPDATED",
            Self::ArticleDeleted { .. } => "SLY_ART_DELETED",
            Self::ArticleRestored { .. } => "SLY_ART_RESTORED",
            Self::ArticleMoved { .. } => "SLY_ART_MOVED",
            Self::ArticleCopied { .. } => "SLY_ART_COPIED",
            Self::ArticleTouched { .. } => "SLY_ART_TOUCHED",
            Self::ArticleStatusChanged { .. } => "SLY_ART_STATUS",
            Self::CategoryAdded { .. } => "SLY_CAT_ADDED",
            Self::CategoryUpdated { .. } => "SLY_CAT_UPDATED",
            Self::CategoryDeleted { .. } => "SLY_CAT_DELETED",
            Self::CategoryMoved { .. } => "SLY_CAT_MOVED",
        }
    }
}
