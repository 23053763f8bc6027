use std::sync::Arc;

use crate::{
    application::{
        commands::{ARTICLE_CACHE_NAMESPACE, ChangeHooks, SLICE_CACHE_NAMESPACE, ensure_capability},
        dto::Actor,
        error::{ApplicationError, ApplicationResult},
        ports::events::Event,
    },
    domain::{
        errors::DomainError,
        language::{ClangId, Language, LanguageRepository, NewLanguage, entity::validate_locale},
    },
};
use serde_json::json;

pub struct AddLanguageCommand {
    pub name: String,
    pub locale: String,
}

pub struct EditLanguageCommand {
    pub id: i64,
    pub name: Option<String>,
    pub locale: Option<String>,
}

pub struct LanguageCommandService {
    repo: Arc<dyn LanguageRepository>,
    hooks: ChangeHooks,
    default_clang: ClangId,
}

impl LanguageCommandService {
    pub(crate) fn new(
        repo: Arc<dyn LanguageRepository>,
        hooks: ChangeHooks,
        default_clang: ClangId,
    ) -> Self {
        Self {
            repo,
            hooks,
            default_clang,
        }
    }

    /// Adds a language and mirrors the whole article tree of the default
    /// language into it.
    pub async fn add_language(
        &self,
        actor: &Actor,
        command: AddLanguageCommand,
    ) -> ApplicationResult<Language> {
        ensure_capability(actor, "languages", "manage")?;

        let new_language = NewLanguage::new(command.name, command.locale)?;
        let copy_from = self
            .repo
            .find_by_id(self.default_clang)
            .await?
            .map(|lang| lang.id);

        let language = self.repo.insert(new_language, copy_from).await?;

        tracing::info!(clang = %language.id, locale = %language.locale, copied_from = ?copy_from, "language added");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE, SLICE_CACHE_NAMESPACE],
                Event::new("SLY_CLANG_ADDED", json!({ "id": language.id, "locale": language.locale })),
            )
            .await?;
        Ok(language)
    }

    pub async fn edit_language(
        &self,
        actor: &Actor,
        command: EditLanguageCommand,
    ) -> ApplicationResult<Language> {
        ensure_capability(actor, "languages", "manage")?;

        let id = ClangId::new(command.id)?;
        let mut language = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("language {id} not found")))?;

        if let Some(name) = command.name {
            if name.trim().is_empty() {
                return Err(ApplicationError::validation("language name cannot be empty"));
            }
            language.name = name.trim().to_string();
        }
        if let Some(locale) = command.locale {
            validate_locale(&locale)?;
            language.locale = locale;
        }

        let updated = self.repo.update(&language).await?;
        self.hooks
            .committed(
                &[],
                Event::new("SLY_CLANG_UPDATED", json!({ "id": updated.id })),
            )
            .await?;
        Ok(updated)
    }

    /// Deletes a language with all of its content. The default language and
    /// the last remaining language cannot be deleted.
    pub async fn delete_language(&self, actor: &Actor, id: i64) -> ApplicationResult<()> {
        ensure_capability(actor, "languages", "manage")?;

        let id = ClangId::new(id)?;
        if id == self.default_clang {
            return Err(DomainError::rule(
                "clang.is_default",
                format!("language {id} is the default language"),
            )
            .into());
        }
        let languages = self.repo.list().await?;
        if !languages.iter().any(|lang| lang.id == id) {
            return Err(ApplicationError::not_found(format!("language {id} not found")));
        }
        if languages.len() <= 1 {
            return Err(DomainError::rule(
                "clang.last_language",
                "the last language cannot be deleted",
            )
            .into());
        }

        self.repo.delete(id).await?;

        tracing::info!(clang = %id, actor = %actor.login, "language deleted");
        self.hooks
            .committed(
                &[ARTICLE_CACHE_NAMESPACE, SLICE_CACHE_NAMESPACE],
                Event::new("SLY_CLANG_DELETED", json!({ "id": id })),
            )
            .await
    }
}
