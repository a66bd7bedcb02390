// teamsync CLI Entry Point

use anyhow::Context;
use teamsync_cli::{output, router::CommandRouter, EXIT_FATAL};

// Requests are issued one at a time
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // ORG and TOKEN may come from a .env file, so load it before parsing flags
    if let Err(e) = load_dotenv() {
        output::print_error(&format!("{:#}", e));
        std::process::exit(EXIT_FATAL);
    }

    if let Err(e) = CommandRouter::route().await {
        tracing::debug!(details = %e.technical_details(), "Command failed");
        output::print_error(&e.user_message());
        std::process::exit(e.exit_code());
    }
}

/// Load `.env` from the working directory or its parents, if there is one
fn load_dotenv() -> anyhow::Result<()> {
    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Failed to load .env file"),
    }
}
