// tests/support/helpers.rs
use std::path::PathBuf;
use std::sync::Arc;

use sly_core::application::{
    ApplicationError,
    dto::Actor,
    services::{ApplicationServices, ServiceDependencies},
};
use sly_core::domain::{
    language::ClangId,
    package::Version,
    user::{Role, UserId},
};
use sly_core::infrastructure::{
    cache::MemoryCache,
    config_store::JsonConfigStore,
    database,
    events::InMemoryEventDispatcher,
    packages::{FilesystemAssetPublisher, FilesystemPackageSource, SqliteScriptRunner},
    repositories::{
        SqliteArticleRepository, SqliteArticleSliceRepository, SqliteLanguageRepository,
        SqliteMediaCategoryRepository, SqliteMediumRepository, SqliteUserRepository,
    },
    storage::LocalMediaStorage,
    util::DefaultSlugGenerator,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

use super::mocks::{PlainPasswordHasher, TestClock};

pub const CORE_VERSION: &str = "0.9.0";

/// A fully wired service graph over an in-memory database and a scratch
/// directory for add-ons, media and published assets.
pub struct TestApp {
    pub services: ApplicationServices,
    pub pool: SqlitePool,
    pub cache: Arc<MemoryCache>,
    pub events: Arc<InMemoryEventDispatcher>,
    pub config: Arc<JsonConfigStore>,
    pub root: TempDir,
}

impl TestApp {
    pub fn addons_dir(&self) -> PathBuf {
        self.root.path().join("addons")
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root.path().join("mediapool")
    }

    pub fn public_dir(&self) -> PathBuf {
        self.root.path().join("public")
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events.names()
    }
}

pub async fn test_app() -> TestApp {
    let root = tempfile::tempdir().expect("tempdir");
    let pool = database::init_memory_pool().await.expect("memory pool");
    database::run_migrations(&pool).await.expect("migrations");

    let cache = Arc::new(MemoryCache::new());
    let events = Arc::new(InMemoryEventDispatcher::new());
    let config = Arc::new(JsonConfigStore::in_memory());
    let articles = Arc::new(SqliteArticleRepository::new(pool.clone()));

    let deps = ServiceDependencies {
        article_read_repo: articles.clone(),
        article_write_repo: articles,
        slice_repo: Arc::new(SqliteArticleSliceRepository::new(pool.clone())),
        language_repo: Arc::new(SqliteLanguageRepository::new(pool.clone())),
        media_category_repo: Arc::new(SqliteMediaCategoryRepository::new(pool.clone())),
        medium_repo: Arc::new(SqliteMediumRepository::new(pool.clone())),
        user_repo: Arc::new(SqliteUserRepository::new(pool.clone())),
        cache: cache.clone(),
        config: config.clone(),
        events: events.clone(),
        media_storage: Arc::new(LocalMediaStorage::new(root.path().join("mediapool"))),
        package_source: Arc::new(FilesystemPackageSource::new([root.path().join("addons")])),
        asset_publisher: Arc::new(FilesystemAssetPublisher::new(root.path().join("public"))),
        sql_runner: Arc::new(SqliteScriptRunner::new(pool.clone())),
        password_hasher: Arc::new(PlainPasswordHasher),
        clock: Arc::new(TestClock),
        slugger: Arc::new(DefaultSlugGenerator),
        default_clang: ClangId(1),
        core_version: Version::parse(CORE_VERSION).expect("core version"),
    };

    TestApp {
        services: ApplicationServices::new(deps),
        pool,
        cache,
        events,
        config,
        root,
    }
}

pub fn system() -> Actor {
    Actor::system()
}

/// An editor with the role's default capabilities and no extra grants.
pub fn editor() -> Actor {
    Actor {
        id: Some(UserId(99)),
        login: "editor".into(),
        role: Role::Editor,
        capabilities: Role::Editor.default_capabilities(),
    }
}

pub fn assert_code<T: std::fmt::Debug>(result: Result<T, ApplicationError>, code: &str) {
    match result {
        Ok(value) => panic!("expected error {code}, got Ok({value:?})"),
        Err(err) => assert_eq!(err.code(), code, "unexpected error: {err}"),
    }
}
