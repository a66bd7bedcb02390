/// Manifest to organization: apply desired team membership
use crate::error::{Result, TeamError};
use crate::invites::{compute_invite_sent, InviteLedger};
use crate::manifest::Manifest;
use crate::reconcile::reconcile;
use crate::snapshot::OrgSnapshot;
use std::collections::BTreeSet;
use teamsync_github::{GitHubError, Login, OrgClient};
use tracing::{info, warn};

/// A single membership change, as `(team slug, login)`
pub type MembershipChange = (String, Login);

/// What an apply run did (or, in dry-run mode, would have done)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub added: Vec<MembershipChange>,
    pub removed: Vec<MembershipChange>,
    pub invited: BTreeSet<Login>,
    pub skipped_invites: BTreeSet<Login>,
    pub dry_run: bool,
}

impl ApplyReport {
    /// True when no mutation was issued or planned
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.invited.is_empty()
    }
}

/// Applies a manifest to the organization through an [`OrgClient`]
pub struct Applier<'a, C: OrgClient + ?Sized> {
    client: &'a C,
    dry_run: bool,
}

impl<'a, C: OrgClient + ?Sized> Applier<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            dry_run: false,
        }
    }

    /// Compute and log every change without issuing mutations
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconcile every team, invite missing users, then refresh `invite_sent`
    ///
    /// Teams are processed in slug order. Every desired slug is checked
    /// against the organization before the first mutation. The first failed
    /// mutation aborts the run; earlier changes stay applied.
    pub async fn apply(&self, manifest: &mut Manifest) -> Result<ApplyReport> {
        let snapshot = OrgSnapshot::fetch_membership(self.client).await?;

        if let Some(slug) = manifest
            .teams
            .keys()
            .find(|slug| !snapshot.team_slugs.contains(*slug))
        {
            return Err(TeamError::UnknownTeam {
                slug: slug.clone(),
                org: self.client.org().to_string(),
            });
        }

        let mut report = ApplyReport {
            dry_run: self.dry_run,
            ..ApplyReport::default()
        };
        let mut ledger = InviteLedger::new(&snapshot.org_members, &snapshot.pending)
            .with_dry_run(self.dry_run);

        for (slug, desired) in &manifest.teams {
            ledger.invite_missing_members(self.client, desired).await?;

            let current = self.client.list_team_members(slug).await?;
            let plan = reconcile(desired, &current, &snapshot.org_members);

            for login in &plan.to_add {
                if self.dry_run {
                    info!("WOULD ADD {}: {}", slug, login);
                } else {
                    self.client
                        .add_team_member(slug, login)
                        .await
                        .map_err(|e| mutation_error("adding", slug, login, e))?;
                    info!("ADD {}: {}", slug, login);
                }
                report.added.push((slug.clone(), login.clone()));
            }

            for login in &plan.to_remove {
                if self.dry_run {
                    info!("WOULD REMOVE {}: {}", slug, login);
                } else {
                    self.client
                        .remove_team_member(slug, login)
                        .await
                        .map_err(|e| mutation_error("removing", slug, login, e))?;
                    info!("REMOVE {}: {}", slug, login);
                }
                report.removed.push((slug.clone(), login.clone()));
            }
        }

        let invited = ledger.invited();
        let invite_sent = compute_invite_sent(
            &manifest.teams,
            &snapshot.pending,
            &invited,
            &snapshot.org_members,
        );
        manifest.set_invite_sent(invite_sent);

        report.invited = if self.dry_run { ledger.planned() } else { invited };
        report.skipped_invites = ledger.skipped();
        if !report.skipped_invites.is_empty() {
            warn!(count = report.skipped_invites.len(), "Some invitations were skipped");
        }
        info!(
            added = report.added.len(),
            removed = report.removed.len(),
            invited = report.invited.len(),
            dry_run = self.dry_run,
            "Apply finished"
        );
        Ok(report)
    }
}

fn mutation_error(action: &'static str, slug: &str, login: &str, err: GitHubError) -> TeamError {
    match err {
        GitHubError::ApiError { status, message } => TeamError::MutationFailed {
            action,
            slug: slug.to_string(),
            login: login.to_string(),
            status,
            message,
        },
        other => TeamError::GitHub(other),
    }
}
