// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{apply, export, validate};
use crate::config::SyncEnv;
use crate::error::CliResult;

/// teamsync - keep GitHub team membership in sync with teams.yaml
#[derive(Parser, Debug)]
#[command(name = "teamsync")]
#[command(bin_name = "teamsync")]
#[command(about = "Keep GitHub team membership in sync with a teams.yaml manifest")]
#[command(
    long_about = "teamsync reconciles a declarative teams.yaml manifest with an organization's team membership.\n\n  • teamsync export    Write live team membership into the manifest\n  • teamsync apply     Apply the manifest to the organization\n  • teamsync validate  Check that every login exists before merging\n\nORG and TOKEN are read from the environment or a .env file."
)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Preview changes without applying them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Path to the manifest
    #[arg(long, value_name = "PATH", default_value = "teams.yaml", global = true)]
    pub manifest: PathBuf,

    #[command(flatten)]
    pub env: SyncEnv,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Export live team membership into the manifest
    #[command(about = "Export the organization's teams into the manifest")]
    Export,

    /// Apply the manifest to the organization
    #[command(about = "Add, remove and invite members so teams match the manifest")]
    Apply,

    /// Validate manifest logins
    #[command(about = "Check that every login exists and report non-members")]
    Validate,
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();

        // Initialize logging based on CLI flags
        crate::logging::init_logging(cli.verbose, cli.quiet);

        Self::execute(&cli).await
    }

    /// Execute a command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        tracing::debug!(command = ?cli.command, manifest = %cli.manifest.display(), "Running command");
        match cli.command {
            Commands::Export => export::run(&cli.env, &cli.manifest).await,
            Commands::Apply => apply::run(&cli.env, &cli.manifest, cli.dry_run).await,
            Commands::Validate => validate::run(&cli.env, &cli.manifest).await,
        }
    }
}
