use super::{AddonCommand, CacheCommand, ClangCommand, Command, UserCommand};
use crate::application::{
    commands::{languages::AddLanguageCommand, users::CreateUserCommand},
    dto::Actor,
    services::ApplicationServices,
};
use crate::domain::user::UserAttributes;
use crate::infrastructure::database;
use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::SqlitePool;

/// What a CLI invocation runs against.
pub struct CliContext {
    pub pool: SqlitePool,
    pub services: ApplicationServices,
    pub actor: Actor,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(command: Command, ctx: &CliContext) -> Result<()> {
    match command {
        Command::Migrate => {
            database::run_migrations(&ctx.pool)
                .await
                .context("running migrations")?;
            tracing::info!("database schema is up to date");
            Ok(())
        }
        Command::Addon(command) => addon(command, ctx).await,
        Command::Cache(CacheCommand::Flush { namespace }) => {
            ctx.services.flush_cache(&ctx.actor, &namespace).await?;
            println!("flushed {namespace}");
            Ok(())
        }
        Command::Clang(command) => clang(command, ctx).await,
        Command::User(command) => user(command, ctx).await,
    }
}

async fn addon(command: AddonCommand, ctx: &CliContext) -> Result<()> {
    let manager = &ctx.services.addon_manager;
    let actor = &ctx.actor;
    match command {
        AddonCommand::List => print_json(&ctx.services.addons.list().await?),
        AddonCommand::Install { name, no_dump } => {
            manager.install(actor, &name, !no_dump).await?;
            println!("installed {name}");
            Ok(())
        }
        AddonCommand::Uninstall { name } => {
            manager.uninstall(actor, &name).await?;
            println!("uninstalled {name}");
            Ok(())
        }
        AddonCommand::Activate { name } => {
            manager.activate(actor, &name).await?;
            println!("activated {name}");
            Ok(())
        }
        AddonCommand::Deactivate { name } => {
            manager.deactivate(actor, &name).await?;
            println!("deactivated {name}");
            Ok(())
        }
        AddonCommand::Order => {
            for name in manager.load_order().await? {
                println!("{name}");
            }
            Ok(())
        }
        AddonCommand::Refresh => {
            let forgotten = manager.refresh(actor).await?;
            if forgotten.is_empty() {
                println!("nothing to forget");
            }
            for name in forgotten {
                println!("forgot {name}");
            }
            Ok(())
        }
    }
}

async fn clang(command: ClangCommand, ctx: &CliContext) -> Result<()> {
    match command {
        ClangCommand::List => print_json(&ctx.services.language_queries.list_languages().await?),
        ClangCommand::Add { name, locale } => {
            let language = ctx
                .services
                .language_commands
                .add_language(&ctx.actor, AddLanguageCommand { name, locale })
                .await?;
            print_json(&language)
        }
        ClangCommand::Delete { id } => {
            ctx.services
                .language_commands
                .delete_language(&ctx.actor, id)
                .await?;
            println!("deleted language {id}");
            Ok(())
        }
    }
}

async fn user(command: UserCommand, ctx: &CliContext) -> Result<()> {
    match command {
        UserCommand::Create {
            login,
            password,
            name,
            role,
        } => {
            let user = ctx
                .services
                .user_commands
                .create_user(
                    &ctx.actor,
                    CreateUserCommand {
                        login,
                        password,
                        name,
                        role: role.into(),
                        attributes: UserAttributes::default(),
                    },
                )
                .await?;
            println!("created user {} ({})", user.login, user.id);
            Ok(())
        }
    }
}
