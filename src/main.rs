use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sly_core::application::{
    dto::Actor,
    ports::cache::Cache,
    services::{ApplicationServices, ServiceDependencies},
};
use sly_core::config::{AppConfig, CacheBackend};
use sly_core::infrastructure::{
    cache::{BlackholeCache, MemoryCache, RedisCache},
    config_store::JsonConfigStore,
    database,
    events::InMemoryEventDispatcher,
    packages::{FilesystemAssetPublisher, FilesystemPackageSource, SqliteScriptRunner},
    repositories::{
        SqliteArticleRepository, SqliteArticleSliceRepository, SqliteLanguageRepository,
        SqliteMediaCategoryRepository, SqliteMediumRepository, SqliteUserRepository,
    },
    security::password::Argon2PasswordHasher,
    storage::LocalMediaStorage,
    time::SystemClock,
    util::DefaultSlugGenerator,
};
use sly_core::presentation::cli::{Cli, CliContext, run};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = bootstrap(cli).await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap(cli: Cli) -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let pool = database::init_pool(config.database_url())
        .await
        .with_context(|| format!("opening {}", config.database_url()))?;

    let cache: Arc<dyn Cache> = match config.cache_backend() {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Blackhole => Arc::new(BlackholeCache),
        CacheBackend::Redis => {
            let url = config.redis_url().context("REDIS_URL is not set")?;
            Arc::new(RedisCache::from_url(url, config.cache_prefix())?)
        }
    };

    let articles = Arc::new(SqliteArticleRepository::new(pool.clone()));
    let deps = ServiceDependencies {
        article_read_repo: articles.clone(),
        article_write_repo: articles,
        slice_repo: Arc::new(SqliteArticleSliceRepository::new(pool.clone())),
        language_repo: Arc::new(SqliteLanguageRepository::new(pool.clone())),
        media_category_repo: Arc::new(SqliteMediaCategoryRepository::new(pool.clone())),
        medium_repo: Arc::new(SqliteMediumRepository::new(pool.clone())),
        user_repo: Arc::new(SqliteUserRepository::new(pool.clone())),
        cache,
        config: Arc::new(JsonConfigStore::open(config.project_config()).await?),
        events: Arc::new(InMemoryEventDispatcher::new()),
        media_storage: Arc::new(LocalMediaStorage::new(config.media_dir())),
        package_source: Arc::new(FilesystemPackageSource::new(config.addon_dirs().to_vec())),
        asset_publisher: Arc::new(FilesystemAssetPublisher::new(config.assets_dir())),
        sql_runner: Arc::new(SqliteScriptRunner::new(pool.clone())),
        password_hasher: Arc::new(Argon2PasswordHasher::default()),
        clock: Arc::new(SystemClock),
        slugger: Arc::new(DefaultSlugGenerator),
        default_clang: config.default_clang(),
        core_version: config.core_version().clone(),
    };

    let ctx = CliContext {
        pool,
        services: ApplicationServices::new(deps),
        actor: Actor::system(),
    };
    run(cli.command, &ctx).await
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}
