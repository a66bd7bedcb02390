// Validate manifest logins before merge

use std::path::Path;

use teamsync_teams::{Manifest, ValidationReport, Validator};

use crate::config::SyncEnv;
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Probe every login, print a report, and fail if any login does not exist
pub async fn run(env: &SyncEnv, manifest_path: &Path) -> CliResult<()> {
    let client = super::connect(env)?;
    let (manifest, _) = Manifest::load(manifest_path)?;

    let report = Validator::new(&client).validate(&manifest).await?;
    println!("{}", render_report(&report, client.org_name(), &OutputStyle::default()));

    report.into_result()?;
    Ok(())
}

/// Per-login lines followed by a summary
pub fn render_report(report: &ValidationReport, org: &str, style: &OutputStyle) -> String {
    let mut lines = Vec::new();
    for login in &report.checked {
        if report.invalid.contains(login) {
            lines.push(style.error(&format!("ERROR: GitHub user '{}' does not exist", login)));
        } else if report.non_members.contains(login) {
            lines.push(style.warning(&format!(
                "WARNING: User '{}' exists but is not a member of the '{}' organization",
                login, org
            )));
        }
    }

    lines.push(String::new());
    if !report.invalid.is_empty() {
        lines.push(style.error(&format!(
            "Validation FAILED: {} invalid username(s) found",
            report.invalid.len()
        )));
        lines.push(format!("Invalid users: {}", style.list(&report.invalid)));
    }
    if !report.non_members.is_empty() {
        lines.push(style.warning(&format!(
            "{} user(s) are not in the organization (invites will be sent once the PR is merged)",
            report.non_members.len()
        )));
        lines.push(format!("Non-org users: {}", style.list(&report.non_members)));
    }
    if report.invalid.is_empty() {
        if report.non_members.is_empty() {
            lines.push(style.success("All usernames are valid and are members of the organization"));
        } else {
            lines.push(style.success(
                "All usernames are valid (some will receive org invites once the PR is merged)",
            ));
        }
    }
    lines.join("\n")
}
