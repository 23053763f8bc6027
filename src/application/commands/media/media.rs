use std::path::PathBuf;

use super::MediaCommandService;
use crate::{
    application::{
        commands::{MEDIA_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
        ports::events::Event,
    },
    domain::media::{MediaCategoryId, Medium, MediumId, NewMedium, filename},
};
use serde_json::json;

/// Upper bound on `name_1`, `name_2`, ... attempts.
const MAX_FILENAME_ATTEMPTS: u32 = 1000;

pub struct AddMediumCommand {
    pub source: PathBuf,
    /// Name the file was uploaded as; defaults to the source file name.
    pub original_name: Option<String>,
    pub title: String,
    pub category: Option<i64>,
}

pub struct EditMediumCommand {
    pub id: i64,
    pub title: Option<String>,
    /// `Some(None)` moves the medium to the top level.
    pub category: Option<Option<i64>>,
}

impl MediaCommandService {
    /// Picks a free, normalized name in the pool: slugged stem, lowercase
    /// extension, `_n` suffix on collision.
    async fn unique_filename(&self, original: &str) -> ApplicationResult<String> {
        let (stem, ext) = filename::split(original);
        let mut slug = self.slugger.slugify(stem).replace('-', "_");
        if slug.is_empty() {
            slug = "file".into();
        }

        for attempt in 0..MAX_FILENAME_ATTEMPTS {
            let candidate = filename::candidate(&slug, ext.as_deref(), attempt);
            let taken = self.storage.exists(&candidate).await?
                || self.medium_repo.find_by_filename(&candidate).await?.is_some();
            if !taken {
                return Ok(candidate);
            }
        }
        Err(ApplicationError::conflict(format!(
            "no free filename for '{original}'"
        )))
    }

    pub async fn add_medium(
        &self,
        actor: &Actor,
        command: AddMediumCommand,
    ) -> ApplicationResult<Medium> {
        ensure_capability(actor, "media", "manage")?;

        let original_name = match command.original_name {
            Some(name) => name,
            None => command
                .source
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .ok_or_else(|| ApplicationError::validation("source has no file name"))?,
        };
        filename::ensure_allowed(&original_name)?;

        let category = command.category.map(MediaCategoryId::new).transpose()?;
        if let Some(category) = category {
            self.require_category(category).await?;
        }

        let target = self.unique_filename(&original_name).await?;
        let size = self.storage.store(&command.source, &target).await?;
        let (_, ext) = filename::split(&target);

        let new_medium = NewMedium {
            category,
            filename: target.clone(),
            original_name,
            mimetype: filename::mimetype(ext.as_deref()).to_string(),
            filesize: i64::try_from(size).unwrap_or(i64::MAX),
            title: command.title.trim().to_string(),
            stamp: actor.stamp(self.clock.now()),
        };

        let medium = match self.medium_repo.insert(new_medium).await {
            Ok(medium) => medium,
            Err(err) => {
                if let Err(cleanup) = self.storage.remove(&target).await {
                    tracing::warn!(file = %target, error = %cleanup, "could not remove orphaned upload");
                }
                return Err(err.into());
            }
        };

        tracing::info!(medium = %medium.id, file = %medium.filename, size, "medium added");
        self.hooks
            .committed(
                &[MEDIA_CACHE_NAMESPACE],
                Event::new("SLY_MEDIA_ADDED", json!({ "id": medium.id, "filename": medium.filename })),
            )
            .await?;
        Ok(medium)
    }

    pub async fn edit_medium(
        &self,
        actor: &Actor,
        command: EditMediumCommand,
    ) -> ApplicationResult<Medium> {
        ensure_capability(actor, "media", "manage")?;

        let id = MediumId::new(command.id)?;
        let existing = self
            .medium_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("medium {id} not found")))?;

        let category = match command.category {
            None => existing.category,
            Some(None) => None,
            Some(Some(raw)) => {
                let category = MediaCategoryId::new(raw)?;
                self.require_category(category).await?;
                Some(category)
            }
        };
        let title = command
            .title
            .map(|t| t.trim().to_string())
            .unwrap_or(existing.title);

        let stamp = actor.stamp(self.clock.now());
        let medium = self
            .medium_repo
            .update(id, &title, category, &stamp)
            .await?;

        self.hooks
            .committed(
                &[MEDIA_CACHE_NAMESPACE],
                Event::new("SLY_MEDIA_UPDATED", json!({ "id": id })),
            )
            .await?;
        Ok(medium)
    }

    pub async fn delete_medium(&self, actor: &Actor, id: i64) -> ApplicationResult<()> {
        ensure_capability(actor, "media", "manage")?;

        let id = MediumId::new(id)?;
        let medium = self
            .medium_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("medium {id} not found")))?;

        self.medium_repo.delete(id).await?;
        self.storage.remove(&medium.filename).await?;

        tracing::info!(medium = %id, file = %medium.filename, "medium deleted");
        self.hooks
            .committed(
                &[MEDIA_CACHE_NAMESPACE],
                Event::new("SLY_MEDIA_DELETED", json!({ "id": id, "filename": medium.filename })),
            )
            .await
    }
}
