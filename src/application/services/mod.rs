// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        ApplicationResult,
        commands::{
            ChangeHooks, addons::AddOnManager, articles::ArticleCommandService,
            categories::CategoryCommandService, ensure_capability,
            languages::LanguageCommandService, media::MediaCommandService,
            slices::ArticleSliceCommandService,
            users::{LoginCommand, UserCommandService},
        },
        dto::Actor,
        ports::{
            cache::Cache,
            config_store::ConfigStore,
            events::EventDispatcher,
            media_storage::MediaStorage,
            packages::{AssetPublisher, PackageSource},
            security::PasswordHasher,
            sql::SqlScriptRunner,
            time::Clock,
            util::SlugGenerator,
        },
        queries::{
            addons::AddOnService, articles::ArticleQueryService,
            languages::LanguageQueryService, media::MediaQueryService,
            packages::PackageService, slices::SliceQueryService, users::UserQueryService,
        },
    },
    domain::{
        article::{ArticleReadRepository, ArticleWriteRepository},
        language::{ClangId, LanguageRepository},
        media::{MediaCategoryRepository, MediumRepository},
        package::Version,
        slice::ArticleSliceRepository,
        user::UserRepository,
    },
};

/// Everything the services are built from: repositories, adapters and settings.
pub struct ServiceDependencies {
    pub article_read_repo: Arc<dyn ArticleReadRepository>,
    pub article_write_repo: Arc<dyn ArticleWriteRepository>,
    pub slice_repo: Arc<dyn ArticleSliceRepository>,
    pub language_repo: Arc<dyn LanguageRepository>,
    pub media_category_repo: Arc<dyn MediaCategoryRepository>,
    pub medium_repo: Arc<dyn MediumRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub cache: Arc<dyn Cache>,
    pub config: Arc<dyn ConfigStore>,
    pub events: Arc<dyn EventDispatcher>,
    pub media_storage: Arc<dyn MediaStorage>,
    pub package_source: Arc<dyn PackageSource>,
    pub asset_publisher: Arc<dyn AssetPublisher>,
    pub sql_runner: Arc<dyn SqlScriptRunner>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
    pub slugger: Arc<dyn SlugGenerator>,
    pub default_clang: ClangId,
    pub core_version: Version,
}

pub struct ApplicationServices {
    pub category_commands: Arc<CategoryCommandService>,
    pub article_commands: Arc<ArticleCommandService>,
    pub slice_commands: Arc<ArticleSliceCommandService>,
    pub language_commands: Arc<LanguageCommandService>,
    pub media_commands: Arc<MediaCommandService>,
    pub user_commands: Arc<UserCommandService>,
    pub addon_manager: Arc<AddOnManager>,
    pub article_queries: Arc<ArticleQueryService>,
    pub slice_queries: Arc<SliceQueryService>,
    pub language_queries: Arc<LanguageQueryService>,
    pub media_queries: Arc<MediaQueryService>,
    pub user_queries: Arc<UserQueryService>,
    pub packages: Arc<PackageService>,
    pub addons: Arc<AddOnService>,
    cache: Arc<dyn Cache>,
}

impl ApplicationServices {
    pub fn new(deps: ServiceDependencies) -> Self {
        let hooks = ChangeHooks::new(Arc::clone(&deps.cache), Arc::clone(&deps.events));

        let category_commands = Arc::new(CategoryCommandService::new(
            Arc::clone(&deps.article_write_repo),
            Arc::clone(&deps.article_read_repo),
            hooks.clone(),
            Arc::clone(&deps.clock),
            deps.default_clang,
        ));
        let article_commands = Arc::new(ArticleCommandService::new(
            Arc::clone(&deps.article_write_repo),
            Arc::clone(&deps.article_read_repo),
            hooks.clone(),
            Arc::clone(&deps.clock),
            deps.default_clang,
        ));
        let slice_commands = Arc::new(ArticleSliceCommandService::new(
            Arc::clone(&deps.slice_repo),
            Arc::clone(&deps.article_read_repo),
            hooks.clone(),
            Arc::clone(&deps.clock),
        ));
        let language_commands = Arc::new(LanguageCommandService::new(
            Arc::clone(&deps.language_repo),
            hooks.clone(),
            deps.default_clang,
        ));
        let media_commands = Arc::new(MediaCommandService::new(
            Arc::clone(&deps.media_category_repo),
            Arc::clone(&deps.medium_repo),
            Arc::clone(&deps.media_storage),
            Arc::clone(&deps.slugger),
            hooks.clone(),
            Arc::clone(&deps.clock),
        ));
        let user_commands = Arc::new(UserCommandService::new(
            Arc::clone(&deps.user_repo),
            Arc::clone(&deps.password_hasher),
            Arc::clone(&deps.events),
            Arc::clone(&deps.clock),
        ));

        let packages = Arc::new(PackageService::new(
            Arc::clone(&deps.package_source),
            deps.core_version.clone(),
        ));
        let addons = Arc::new(AddOnService::new(
            Arc::clone(&deps.config),
            Arc::clone(&packages),
        ));
        let addon_manager = Arc::new(AddOnManager::new(
            Arc::clone(&addons),
            Arc::clone(&deps.sql_runner),
            Arc::clone(&deps.asset_publisher),
            hooks,
        ));

        let article_queries = Arc::new(ArticleQueryService::new(
            Arc::clone(&deps.article_read_repo),
            Arc::clone(&deps.cache),
            deps.default_clang,
        ));
        let slice_queries = Arc::new(SliceQueryService::new(
            Arc::clone(&deps.slice_repo),
            Arc::clone(&deps.article_read_repo),
            Arc::clone(&deps.cache),
        ));
        let language_queries = Arc::new(LanguageQueryService::new(Arc::clone(&deps.language_repo)));
        let media_queries = Arc::new(MediaQueryService::new(
            Arc::clone(&deps.media_category_repo),
            Arc::clone(&deps.medium_repo),
            Arc::clone(&deps.media_storage),
            Arc::clone(&deps.cache),
        ));
        let user_queries = Arc::new(UserQueryService::new(Arc::clone(&deps.user_repo)));

        Self {
            category_commands,
            article_commands,
            slice_commands,
            language_commands,
            media_commands,
            user_commands,
            addon_manager,
            article_queries,
            slice_queries,
            language_queries,
            media_queries,
            user_queries,
            packages,
            addons,
            cache: deps.cache,
        }
    }

    pub fn cache(&self) -> Arc<dyn Cache> {
        Arc::clone(&self.cache)
    }

    /// Logs a user in and returns the actor to run commands with.
    pub async fn authenticate(&self, login: &str, password: &str) -> ApplicationResult<Actor> {
        let user = self
            .user_commands
            .login(LoginCommand {
                login: login.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(Actor::from(&user))
    }

    /// Flushes `namespace` and everything nested below it.
    pub async fn flush_cache(&self, actor: &Actor, namespace: &str) -> ApplicationResult<()> {
        ensure_capability(actor, "system", "cache")?;
        crate::application::ports::cache::validate_namespace(namespace)?;
        self.cache.flush(namespace, true).await?;
        tracing::info!(namespace, "cache flushed");
        Ok(())
    }
}
