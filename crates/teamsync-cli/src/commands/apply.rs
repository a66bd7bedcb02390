// Apply the manifest to the organization

use std::path::Path;

use teamsync_teams::{write_if_changed, Applier, ApplyReport, Manifest};

use crate::config::{write_changed_output, SyncEnv};
use crate::error::CliResult;
use crate::output::{self, OutputStyle};

/// Run the applier, then persist the refreshed `invite_sent`
///
/// In dry-run mode nothing is mutated and the manifest is left untouched.
pub async fn run(env: &SyncEnv, manifest_path: &Path, dry_run: bool) -> CliResult<()> {
    let client = super::connect(env)?;
    let (mut manifest, old_text) = Manifest::load(manifest_path)?;

    let report = Applier::new(&client)
        .with_dry_run(dry_run)
        .apply(&mut manifest)
        .await?;
    let text = manifest.render()?;

    let changed = if dry_run {
        if text != old_text {
            output::print_info(&format!(
                "{} would be updated (dry run, not written)",
                manifest_path.display()
            ));
        }
        false
    } else {
        write_if_changed(manifest_path, Some(&old_text), &text)?
    };

    if let Some(path) = &env.github_output {
        write_changed_output(path, changed)?;
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &ApplyReport) {
    let style = OutputStyle::default();
    if !report.skipped_invites.is_empty() {
        output::print_warning(&format!(
            "Invitations skipped: {}",
            style.list(&report.skipped_invites)
        ));
    }
    let verb = if report.dry_run { "Would apply" } else { "Applied" };
    output::print_success(&format!(
        "{}: {} added, {} removed, {} invited.",
        verb,
        report.added.len(),
        report.removed.len(),
        report.invited.len()
    ));
}
