// src/application/commands/slices/service.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::{ChangeHooks, SLICE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
        ports::{events::Event, time::Clock},
    },
    domain::{
        article::{ArticleId, ArticleReadRepository, RevisionSelector},
        errors::DomainError,
        language::ClangId,
        slice::{
            ArticleSlice, ArticleSliceId, ArticleSliceRepository, NewArticleSlice, RevisionKey,
            SliceValues, SlotName,
        },
    },
};
use serde_json::json;

pub struct AddSliceCommand {
    pub article_id: i64,
    pub clang: i64,
    /// Defaults to the latest revision.
    pub revision: Option<i64>,
    pub slot: String,
    pub module: String,
    pub values: SliceValues,
    /// 0-based; omitted or too large positions append, negative values insert first.
    pub position: Option<i64>,
}

pub struct EditSliceCommand {
    pub id: i64,
    pub values: SliceValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceDirection {
    Up,
    Down,
}

pub struct MoveSliceCommand {
    pub id: i64,
    pub direction: SliceDirection,
}

pub struct ArticleSliceCommandService {
    slice_repo: Arc<dyn ArticleSliceRepository>,
    article_repo: Arc<dyn ArticleReadRepository>,
    hooks: ChangeHooks,
    clock: Arc<dyn Clock>,
}

impl ArticleSliceCommandService {
    pub(crate) fn new(
        slice_repo: Arc<dyn ArticleSliceRepository>,
        article_repo: Arc<dyn ArticleReadRepository>,
        hooks: ChangeHooks,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            slice_repo,
            article_repo,
            hooks,
            clock,
        }
    }

    /// Only the latest revision of an article may be edited; older revisions
    /// are history.
    async fn ensure_editable(&self, key: RevisionKey) -> ApplicationResult<()> {
        let row = self
            .article_repo
            .find(key.article_id, key.clang, RevisionSelector::Exact(key.revision))
            .await?
            .ok_or_else(|| {
                ApplicationError::not_found(format!(
                    "article {} has no revision {} in clang {}",
                    key.article_id, key.revision, key.clang
                ))
            })?;
        if !row.latest {
            return Err(DomainError::rule(
                "slice.revision_not_latest",
                format!(
                    "revision {} of article {} is not the latest revision",
                    key.revision, key.article_id
                ),
            )
            .into());
        }
        Ok(())
    }

    async fn require_slice(&self, id: ArticleSliceId) -> ApplicationResult<ArticleSlice> {
        self.slice_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("slice {id} not found")))
    }

    async fn changed(&self, name: &str, slice: &ArticleSlice) -> ApplicationResult<()> {
        self.hooks
            .committed(
                &[SLICE_CACHE_NAMESPACE],
                Event::new(
                    name,
                    json!({
                        "id": slice.id,
                        "article_id": slice.key.article_id,
                        "clang": slice.key.clang,
                        "revision": slice.key.revision,
                        "slot": slice.slot,
                    }),
                ),
            )
            .await
    }

    pub async fn add_slice(
        &self,
        actor: &Actor,
        command: AddSliceCommand,
    ) -> ApplicationResult<ArticleSlice> {
        ensure_capability(actor, "pages", "edit")?;

        let article_id = ArticleId::new(command.article_id)?;
        let clang = ClangId::new(command.clang)?;
        let revision = match command.revision {
            Some(revision) => revision,
            None => {
                self.article_repo
                    .find(article_id, clang, RevisionSelector::Latest)
                    .await?
                    .ok_or_else(|| {
                        ApplicationError::not_found(format!("article {article_id} not found"))
                    })?
                    .revision
            }
        };
        let key = RevisionKey::new(article_id, clang, revision);
        self.ensure_editable(key).await?;

        let module = command.module.trim().to_string();
        if module.is_empty() {
            return Err(ApplicationError::validation("module cannot be empty"));
        }

        let slice = self
            .slice_repo
            .insert(NewArticleSlice {
                key,
                slot: SlotName::new(command.slot)?,
                position: command.position,
                module,
                values: command.values,
                stamp: actor.stamp(self.clock.now()),
            })
            .await?;

        tracing::info!(slice = %slice.id, article = %article_id, slot = %slice.slot, "slice added");
        self.changed("SLY_SLICE_ADDED", &slice).await?;
        Ok(slice)
    }

    pub async fn edit_slice(
        &self,
        actor: &Actor,
        command: EditSliceCommand,
    ) -> ApplicationResult<ArticleSlice> {
        ensure_capability(actor, "pages", "edit")?;

        let id = ArticleSliceId::new(command.id)?;
        let existing = self.require_slice(id).await?;
        self.ensure_editable(existing.key).await?;

        let stamp = actor.stamp(self.clock.now());
        let slice = self
            .slice_repo
            .update_values(id, command.values, &stamp)
            .await?;

        tracing::info!(slice = %id, "slice updated");
        self.changed("SLY_SLICE_UPDATED", &slice).await?;
        Ok(slice)
    }

    pub async fn delete_slice(&self, actor: &Actor, id: i64) -> ApplicationResult<()> {
        ensure_capability(actor, "pages", "edit")?;

        let id = ArticleSliceId::new(id)?;
        let existing = self.require_slice(id).await?;
        self.ensure_editable(existing.key).await?;

        self.slice_repo.delete(id).await?;

        tracing::info!(slice = %id, "slice deleted");
        self.changed("SLY_SLICE_DELETED", &existing).await
    }

    /// Swaps the slice with its neighbour. Returns `false` when it already
    /// sits at the edge of its slot.
    pub async fn move_slice(
        &self,
        actor: &Actor,
        command: MoveSliceCommand,
    ) -> ApplicationResult<bool> {
        ensure_capability(actor, "pages", "edit")?;

        let id = ArticleSliceId::new(command.id)?;
        let slice = self.require_slice(id).await?;
        self.ensure_editable(slice.key).await?;

        let wanted = match command.direction {
            SliceDirection::Up => slice.position - 1,
            SliceDirection::Down => slice.position + 1,
        };
        let siblings = self.slice_repo.list(slice.key, Some(&slice.slot)).await?;
        let Some(neighbour) = siblings.iter().find(|s| s.position == wanted) else {
            return Ok(false);
        };

        let stamp = actor.stamp(self.clock.now());
        self.slice_repo.swap(id, neighbour.id, &stamp).await?;

        tracing::info!(slice = %id, direction = ?command.direction, "slice moved");
        self.changed("SLY_SLICE_MOVED", &slice).await?;
        Ok(true)
    }
}
