//! The `sly` maintenance command line.

mod run;

use crate::domain::user::Role;
use clap::{Parser, Subcommand, ValueEnum};

pub use run::{CliContext, run};

#[derive(Debug, Parser)]
#[command(name = "sly")]
#[command(about = "Maintenance tool for the sly content core")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Manage add-ons
    #[command(subcommand)]
    Addon(AddonCommand),
    /// Cache maintenance
    #[command(subcommand)]
    Cache(CacheCommand),
    /// Manage content languages
    #[command(subcommand)]
    Clang(ClangCommand),
    /// Manage backend users
    #[command(subcommand)]
    User(UserCommand),
}

#[derive(Debug, Subcommand)]
pub enum AddonCommand {
    /// List every known add-on with its state
    List,
    /// Install an add-on
    Install {
        /// Package name, e.g. `acme/gallery`
        name: String,
        /// Skip the add-on's install SQL dump
        #[arg(long)]
        no_dump: bool,
    },
    /// Uninstall an add-on
    Uninstall { name: String },
    /// Activate an installed add-on, updating it first when needed
    Activate { name: String },
    /// Deactivate an add-on
    Deactivate { name: String },
    /// Print activated add-ons in boot order
    Order,
    /// Forget add-ons that vanished from disk
    Refresh,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Recursively flush a cache namespace
    Flush {
        /// Namespace to flush
        #[arg(default_value = "sly")]
        namespace: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ClangCommand {
    /// List content languages
    List,
    /// Add a language; the default language's content is copied into it
    Add {
        #[arg(long)]
        name: String,
        /// Locale such as `de_DE`
        #[arg(long)]
        locale: String,
    },
    /// Delete a language and all of its content
    Delete { id: i64 },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Editor,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Admin => Role::Admin,
            RoleArg::Editor => Role::Editor,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a backend user
    Create {
        #[arg(long)]
        login: String,
        /// Password; read from SLY_USER_PASSWORD when omitted
        #[arg(long, env = "SLY_USER_PASSWORD", hide_env_values = true)]
        password: String,
        /// Display name, defaults to the login
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum, default_value_t = RoleArg::Editor)]
        role: RoleArg,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_subcommands() {
        let cli = Cli::try_parse_from(["sly", "addon", "install", "acme/gallery", "--no-dump"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Addon(AddonCommand::Install { ref name, no_dump: true }) if name == "acme/gallery"
        ));

        let cli = Cli::try_parse_from(["sly", "cache", "flush"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Cache(CacheCommand::Flush { ref namespace }) if namespace == "sly"
        ));
    }

    #[test]
    fn user_create_takes_a_role() {
        let cli = Cli::try_parse_from([
            "sly", "user", "create", "--login", "jane", "--password", "longenough", "--role", "admin",
        ])
        .unwrap();
        let Command::User(UserCommand::Create { role, name, .. }) = cli.command else {
            panic!("expected user create");
        };
        assert!(matches!(Role::from(role), Role::Admin));
        assert!(name.is_none());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
