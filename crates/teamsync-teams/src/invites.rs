/// Organization invitations and the `invite_sent` status cache
use crate::error::{Result, TeamError};
use crate::manifest::TeamMap;
use std::collections::{BTreeMap, BTreeSet};
use teamsync_github::{GitHubError, InvitationOutcome, Login, OrgClient};
use tracing::{debug, info};

/// Recompute the invite-status cache from current state
///
/// `(pending ∪ invited_this_run) ∩ desired_all − org_members`
pub fn compute_invite_sent(
    teams: &TeamMap,
    pending: &BTreeSet<Login>,
    invited_this_run: &BTreeSet<Login>,
    org_members: &BTreeSet<Login>,
) -> BTreeSet<Login> {
    teams
        .values()
        .flatten()
        .filter(|login| pending.contains(*login) || invited_this_run.contains(*login))
        .filter(|login| !org_members.contains(*login))
        .cloned()
        .collect()
}

/// What happened to one login during the invitation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteOutcome {
    /// Already an org member, nothing to do
    Member,
    /// Already has a pending invitation
    Pending,
    /// Invitation created this run
    Invited,
    /// The service reported a conflict; carries its message
    Skipped(String),
    /// Would have been invited (dry run)
    Planned,
}

/// Run-scoped memo of invitation outcomes keyed by login
///
/// A login listed in several teams is resolved and invited at most once.
pub struct InviteLedger<'a> {
    org_members: &'a BTreeSet<Login>,
    pending: &'a BTreeSet<Login>,
    dry_run: bool,
    outcomes: BTreeMap<Login, InviteOutcome>,
}

impl<'a> InviteLedger<'a> {
    pub fn new(org_members: &'a BTreeSet<Login>, pending: &'a BTreeSet<Login>) -> Self {
        Self {
            org_members,
            pending,
            dry_run: false,
            outcomes: BTreeMap::new(),
        }
    }

    /// Record would-be invitations without calling the service
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Invite every login of `desired` that is neither a member nor pending
    ///
    /// Logins are handled in lexicographic order. An unknown user or a
    /// rejected invitation aborts; a conflict is logged and skipped.
    pub async fn invite_missing_members<C>(
        &mut self,
        client: &C,
        desired: &BTreeSet<Login>,
    ) -> Result<()>
    where
        C: OrgClient + ?Sized,
    {
        for login in desired {
            if self.outcomes.contains_key(login) {
                continue;
            }
            let outcome = if self.org_members.contains(login) {
                InviteOutcome::Member
            } else if self.pending.contains(login) {
                debug!(login = %login, "Invitation already pending");
                InviteOutcome::Pending
            } else if self.dry_run {
                info!("WOULD INVITE: {}", login);
                InviteOutcome::Planned
            } else {
                invite(client, login).await?
            };
            self.outcomes.insert(login.clone(), outcome);
        }
        Ok(())
    }

    /// Logins invited successfully during this run
    pub fn invited(&self) -> BTreeSet<Login> {
        self.logins_where(|outcome| *outcome == InviteOutcome::Invited)
    }

    /// Logins that a dry run would have invited
    pub fn planned(&self) -> BTreeSet<Login> {
        self.logins_where(|outcome| *outcome == InviteOutcome::Planned)
    }

    /// Logins whose invitation the service refused as a conflict
    pub fn skipped(&self) -> BTreeSet<Login> {
        self.logins_where(|outcome| matches!(outcome, InviteOutcome::Skipped(_)))
    }

    pub fn outcome(&self, login: &str) -> Option<&InviteOutcome> {
        self.outcomes.get(login)
    }

    fn logins_where(&self, pred: impl Fn(&InviteOutcome) -> bool) -> BTreeSet<Login> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| pred(outcome))
            .map(|(login, _)| login.clone())
            .collect()
    }
}

async fn invite<C>(client: &C, login: &str) -> Result<InviteOutcome>
where
    C: OrgClient + ?Sized,
{
    let user_id = client.resolve_user_id(login).await.map_err(|e| match e {
        GitHubError::NotFound(_) => TeamError::UnknownUser(login.to_string()),
        other => TeamError::GitHub(other),
    })?;

    match client.create_invitation(user_id).await {
        Ok(InvitationOutcome::Created) => {
            info!("INVITED: {}", login);
            Ok(InviteOutcome::Invited)
        }
        Ok(InvitationOutcome::Conflict(message)) => {
            info!("INVITE SKIPPED: {} -> {}", login, message);
            Ok(InviteOutcome::Skipped(message))
        }
        // 429 and 5xx stay transport failures
        Err(GitHubError::ApiError { status, message }) if status < 500 && status != 429 => {
            Err(TeamError::InviteFailed {
                login: login.to_string(),
                status,
                message,
            })
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<Login> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_invite_sent_keeps_desired_pending_non_members() {
        let mut teams = TeamMap::new();
        teams.insert("core".to_string(), set(&["alice", "charlie", "dave"]));
        teams.insert("web".to_string(), set(&["erin"]));

        let invite_sent = compute_invite_sent(
            &teams,
            &set(&["charlie", "zed", "alice"]),
            &set(&["erin"]),
            &set(&["alice"]),
        );
        assert_eq!(invite_sent, set(&["charlie", "erin"]));
    }

    #[test]
    fn test_invite_sent_empty_without_invites() {
        let mut teams = TeamMap::new();
        teams.insert("core".to_string(), set(&["alice"]));
        assert!(compute_invite_sent(&teams, &set(&[]), &set(&[]), &set(&[])).is_empty());
    }

    #[test]
    fn test_ledger_starts_empty() {
        let members = set(&["alice"]);
        let pending = set(&[]);
        let ledger = InviteLedger::new(&members, &pending);
        assert!(ledger.invited().is_empty());
        assert!(ledger.outcome("alice").is_none());
    }
}
