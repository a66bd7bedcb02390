/// Organization to manifest: export live team membership
use crate::error::Result;
use crate::invites::compute_invite_sent;
use crate::manifest::{Manifest, TeamMap};
use crate::snapshot::OrgSnapshot;
use std::collections::BTreeSet;
use teamsync_github::{Login, OrgClient};
use tracing::{debug, info};

/// Logins from a team's previous desired set that are still waiting on an invitation
///
/// These users cannot show up in live team membership until they join the
/// organization, so an export would otherwise drop them.
pub fn preserve_pending(
    old_desired: &BTreeSet<Login>,
    pending: &BTreeSet<Login>,
    org_members: &BTreeSet<Login>,
) -> BTreeSet<Login> {
    old_desired
        .iter()
        .filter(|login| pending.contains(*login) && !org_members.contains(*login))
        .cloned()
        .collect()
}

/// Result of an export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    /// The manifest to write back
    pub manifest: Manifest,
    /// Per team, logins kept only because their invitation is pending
    pub preserved: TeamMap,
}

/// Builds a manifest from the organization's live team membership
pub struct Exporter<'a, C: OrgClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: OrgClient + ?Sized> Exporter<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Export every remote team, keeping pending invitees from `previous`
    ///
    /// Top-level keys of `previous` other than `teams` and `invite_sent` are
    /// carried over.
    pub async fn export(&self, previous: &Manifest) -> Result<ExportReport> {
        let snapshot = OrgSnapshot::fetch_with_teams(self.client).await?;

        let mut teams = TeamMap::new();
        let mut preserved = TeamMap::new();
        for (slug, live) in &snapshot.teams {
            let kept = previous
                .teams
                .get(slug)
                .map(|old| preserve_pending(old, &snapshot.pending, &snapshot.org_members))
                .unwrap_or_default();
            if !kept.is_empty() {
                debug!(team = %slug, count = kept.len(), "Preserving pending invitees");
                preserved.insert(slug.clone(), kept.clone());
            }
            teams.insert(slug.clone(), live.union(&kept).cloned().collect());
        }

        let invite_sent = compute_invite_sent(
            &teams,
            &snapshot.pending,
            &BTreeSet::new(),
            &snapshot.org_members,
        );
        info!(
            teams = teams.len(),
            invite_sent = invite_sent.len(),
            "Exported organization teams"
        );

        let manifest = Manifest {
            teams,
            invite_sent,
            extra: previous.extra.clone(),
        };
        Ok(ExportReport {
            manifest,
            preserved,
        })
    }
}
