// src/application/commands/categories/service.rs
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

pub struct CategoryCommandService {
    pub(super) write_repo: Arc<dyn ArticleWriteRepository>,
    pub(super) read_repo: Arc<dyn ArticleReadRepository>,
    pub(super) hooks: ChangeHooks,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) default_clang: ClangId,
}

impl CategoryCommandService {
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

    pub(super) async fn require_category(
        &self,
        id: ArticleId,
        clang: ClangId,
    ) -> ApplicationResult<Article> {
        match self
            .read_repo
            .find(id, clang, RevisionSelector::Latest)
            .await?
        {
            Some(row) if row.is_category() => Ok(row),
            _ => Err(ApplicationError::not_found(format!("category {id} not found"))),
        }
    }
}
