// Export live team membership into the manifest

use std::path::Path;

use teamsync_teams::{write_if_changed, Exporter, Manifest};

use crate::config::{write_changed_output, SyncEnv};
use crate::error::CliResult;
use crate::output;

/// Run the exporter and rewrite the manifest if its content changed
pub async fn run(env: &SyncEnv, manifest_path: &Path) -> CliResult<()> {
    let client = super::connect(env)?;
    let (previous, old_text) = Manifest::load_or_default(manifest_path)?;

    let report = Exporter::new(&client).export(&previous).await?;
    let text = report.manifest.render()?;
    let changed = write_if_changed(manifest_path, old_text.as_deref(), &text)?;

    if let Some(path) = &env.github_output {
        write_changed_output(path, changed)?;
    }

    for (slug, kept) in &report.preserved {
        output::print_info(&format!(
            "Kept pending invitees in {}: {}",
            slug,
            output::OutputStyle::default().list(kept)
        ));
    }
    output::print_success(&format!(
        "Wrote {} with {} teams; invite_sent={}.",
        manifest_path.display(),
        report.manifest.teams.len(),
        report.manifest.invite_sent.len()
    ));
    Ok(())
}
