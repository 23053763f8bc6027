// src/application/commands/articles/service.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::ChangeHooks,
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        article::{Article, ArticleId, ArticleReadRepository, ArticleWriteRepository, RevisionSelector},
        language::ClangId,
    },
};

pub struct ArticleCommandService {
    pub(super) write_repo: Arc<dyn ArticleWriteRepository>,
    pub(super) read_repo: Arc<dyn ArticleReadRepository>,
    pub(super) hooks: ChangeHooks,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) default_clang: ClangId,
}

impl ArticleCommandService {
    pub(crate) fn new(
        write_repo: Arc<dyn ArticleWriteRepository>,
        read_repo: Arc<dyn ArticleReadRepository>,
        hooks: ChangeHooks,
        clock: Arc<dyn Clock>,
        default_clang: ClangId,
    ) -> Self {
        Self {
            write_repo,
            read_repo,
            hooks,
            clock,
            default_clang,
        }
    }

    pub(super) async fn require_article(
        &self,
        id: ArticleId,
        clang: ClangId,
    ) -> ApplicationResult<Article> {
        self.read_repo
            .find(id, clang, RevisionSelector::Latest)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))
    }

    /// `None` is the top level and always exists.
    pub(super) async fn require_target_category(
        &self,
        category: Option<ArticleId>,
    ) -> ApplicationResult<()> {
        let Some(id) = category else {
            return Ok(());
        };
        match self
            .read_repo
            .find(id, self.default_clang, RevisionSelector::Latest)
            .await?
        {
            Some(row) if row.is_category() => Ok(()),
            _ => Err(ApplicationError::not_found(format!("category {id} not found"))),
        }
    }
}
