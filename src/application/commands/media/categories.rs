use super::MediaCommandService;
use crate::{
    application::{
        commands::{MEDIA_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
        ports::events::Event,
    },
    domain::{
        article::ArticlePath,
        errors::DomainError,
        media::{MediaCategory, MediaCategoryId, NewMediaCategory},
    },
};
use serde_json::json;

pub struct AddMediaCategoryCommand {
    pub name: String,
    pub parent: Option<i64>,
}

fn clean_name(name: &str) -> ApplicationResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApplicationError::validation("media category name cannot be empty"));
    }
    Ok(name.to_string())
}

impl MediaCommandService {
    pub async fn add_media_category(
        &self,
        actor: &Actor,
        command: AddMediaCategoryCommand,
    ) -> ApplicationResult<MediaCategory> {
        ensure_capability(actor, "media", "manage")?;

        let name = clean_name(&command.name)?;
        let parent = command.parent.map(MediaCategoryId::new).transpose()?;
        let path = match parent {
            Some(parent_id) => self.require_category(parent_id).await?.child_path(),
            None => ArticlePath::root(),
        };

        let category = self
            .category_repo
            .insert(NewMediaCategory {
                name,
                parent,
                path,
                stamp: actor.stamp(self.clock.now()),
            })
            .await?;

        tracing::info!(media_category = %category.id, "media category added");
        self.hooks
            .committed(
                &[MEDIA_CACHE_NAMESPACE],
                Event::new("SLY_MEDIACAT_ADDED", json!({ "id": category.id })),
            )
            .await?;
        Ok(category)
    }

    pub async fn rename_media_category(
        &self,
        actor: &Actor,
        id: i64,
        name: &str,
    ) -> ApplicationResult<MediaCategory> {
        ensure_capability(actor, "media", "manage")?;

        let id = MediaCategoryId::new(id)?;
        let name = clean_name(name)?;
        self.require_category(id).await?;

        let stamp = actor.stamp(self.clock.now());
        let category = self.category_repo.rename(id, &name, &stamp).await?;
        self.hooks
            .committed(
                &[MEDIA_CACHE_NAMESPACE],
                Event::new("SLY_MEDIACAT_UPDATED", json!({ "id": id })),
            )
            .await?;
        Ok(category)
    }

    /// Only empty categories can be deleted: no child categories
    /// (`media_category.has_children`) and no media (`media_category.has_media`).
    pub async fn delete_media_category(&self, actor: &Actor, id: i64) -> ApplicationResult<()> {
        ensure_capability(actor, "media", "manage")?;

        let id = MediaCategoryId::new(id)?;
        self.require_category(id).await?;

        if !self.category_repo.children(Some(id)).await?.is_empty() {
            return Err(DomainError::rule(
                "media_category.has_children",
                format!("media category {id} has child categories"),
            )
            .into());
        }
        let media = self.medium_repo.count_in_category(id).await?;
        if media > 0 {
            return Err(DomainError::rule(
                "media_category.has_media",
                format!("media category {id} still holds {media} files"),
            )
            .into());
        }

        self.category_repo.delete(id).await?;

        tracing::info!(media_category = %id, "media category deleted");
        self.hooks
            .committed(
                &[MEDIA_CACHE_NAMESPACE],
                Event::new("SLY_MEDIACAT_DELETED", json!({ "id": id })),
            )
            .await
    }
}
