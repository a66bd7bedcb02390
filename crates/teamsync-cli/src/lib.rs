// teamsync CLI Library

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;

pub use config::{write_changed_output, SyncEnv, CHANGED_OUTPUT_KEY};
pub use error::{CliError, CliResult, EXIT_FATAL, EXIT_TRANSPORT};
pub use logging::{init_logging, VerbosityLevel};
pub use output::OutputStyle;
pub use router::{Cli, CommandRouter, Commands};
