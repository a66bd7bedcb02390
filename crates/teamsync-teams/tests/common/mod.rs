//! In-memory organization used by the flow tests

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use teamsync_github::{GitHubError, InvitationOutcome, Login, OrgClient, Result, UserId};

/// A call made against the fake, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add(String, Login),
    Remove(String, Login),
    Resolve(Login),
    Invite(UserId),
    Exists(Login),
}

#[derive(Debug, Default)]
struct State {
    members: BTreeSet<Login>,
    pending: BTreeSet<Login>,
    teams: BTreeMap<String, BTreeSet<Login>>,
    users: BTreeMap<Login, UserId>,
    conflicts: BTreeSet<Login>,
    failing_adds: BTreeSet<Login>,
    failing_invites: BTreeMap<Login, u16>,
    rate_limited: bool,
    calls: Vec<Call>,
}

/// Organization state that mutations actually change, so runs can be repeated
#[derive(Debug, Default)]
pub struct FakeOrg {
    state: Mutex<State>,
}

fn set(items: &[&str]) -> BTreeSet<Login> {
    items.iter().map(|s| s.to_string()).collect()
}

impl FakeOrg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Org members; each also becomes a known user
    pub fn with_members(self, logins: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.members.extend(set(logins));
        }
        self.with_users(logins)
    }

    pub fn with_pending(self, logins: &[&str]) -> Self {
        self.state.lock().unwrap().pending.extend(set(logins));
        self.with_users(logins)
    }

    /// Accounts that exist but are not necessarily members
    pub fn with_users(self, logins: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for login in logins {
                let next = state.users.len() as UserId + 1;
                state.users.entry(login.to_string()).or_insert(next);
            }
        }
        self
    }

    pub fn with_team(self, slug: &str, logins: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .teams
            .insert(slug.to_string(), set(logins));
        self
    }

    /// Invitations for these logins come back as 422 conflicts
    pub fn with_conflict(self, login: &str) -> Self {
        self.state.lock().unwrap().conflicts.insert(login.to_string());
        self
    }

    /// Adding this login to any team is rejected with 403
    pub fn with_failing_add(self, login: &str) -> Self {
        self.state.lock().unwrap().failing_adds.insert(login.to_string());
        self
    }

    /// Invitations for this login are answered with `status`
    pub fn with_failing_invite(self, login: &str, status: u16) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_invites
            .insert(login.to_string(), status);
        self
    }

    /// Existence probes report an exhausted rate limit
    pub fn rate_limited(self) -> Self {
        self.state.lock().unwrap().rate_limited = true;
        self
    }

    /// Simulate a user accepting their invitation
    pub fn accept_invite(&self, login: &str) {
        let mut state = self.state.lock().unwrap();
        state.pending.remove(login);
        state.members.insert(login.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Calls that change remote state or create invitations
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Add(..) | Call::Remove(..) | Call::Invite(_)))
            .collect()
    }

    pub fn team(&self, slug: &str) -> BTreeSet<Login> {
        self.state
            .lock()
            .unwrap()
            .teams
            .get(slug)
            .cloned()
            .unwrap_or_default()
    }

    pub fn pending(&self) -> BTreeSet<Login> {
        self.state.lock().unwrap().pending.clone()
    }
}

#[async_trait]
impl OrgClient for FakeOrg {
    fn org(&self) -> &str {
        "acme"
    }

    async fn list_org_members(&self) -> Result<BTreeSet<Login>> {
        Ok(self.state.lock().unwrap().members.clone())
    }

    async fn list_pending_invites(&self) -> Result<BTreeSet<Login>> {
        Ok(self.state.lock().unwrap().pending.clone())
    }

    async fn list_team_slugs(&self) -> Result<BTreeSet<String>> {
        Ok(self.state.lock().unwrap().teams.keys().cloned().collect())
    }

    async fn list_team_members(&self, slug: &str) -> Result<BTreeSet<Login>> {
        self.state
            .lock()
            .unwrap()
            .teams
            .get(slug)
            .cloned()
            .ok_or_else(|| GitHubError::api_error(404, "Not Found"))
    }

    async fn add_team_member(&self, slug: &str, login: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Add(slug.to_string(), login.to_string()));
        if state.failing_adds.contains(login) {
            return Err(GitHubError::api_error(403, "Must have admin rights"));
        }
        state
            .teams
            .entry(slug.to_string())
            .or_default()
            .insert(login.to_string());
        Ok(())
    }

    async fn remove_team_member(&self, slug: &str, login: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Remove(slug.to_string(), login.to_string()));
        if let Some(team) = state.teams.get_mut(slug) {
            team.remove(login);
        }
        Ok(())
    }

    async fn resolve_user_id(&self, login: &str) -> Result<UserId> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Resolve(login.to_string()));
        state
            .users
            .get(login)
            .copied()
            .ok_or_else(|| GitHubError::not_found(login))
    }

    async fn create_invitation(&self, user_id: UserId) -> Result<InvitationOutcome> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Invite(user_id));
        let login = state
            .users
            .iter()
            .find(|(_, id)| **id == user_id)
            .map(|(login, _)| login.clone())
            .ok_or_else(|| GitHubError::api_error(404, "Not Found"))?;
        if let Some(status) = state.failing_invites.get(&login) {
            return Err(GitHubError::api_error(*status, "invitation rejected"));
        }
        if state.conflicts.contains(&login) {
            return Ok(InvitationOutcome::Conflict("Validation Failed".to_string()));
        }
        state.pending.insert(login);
        Ok(InvitationOutcome::Created)
    }

    async fn user_exists(&self, login: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Exists(login.to_string()));
        if state.rate_limited {
            return Err(GitHubError::RateLimitExceeded);
        }
        Ok(state.users.contains_key(login))
    }
}

/// Build a manifest from `(slug, logins)` pairs
pub fn manifest(teams: &[(&str, &[&str])]) -> teamsync_teams::Manifest {
    let mut manifest = teamsync_teams::Manifest::default();
    for (slug, logins) in teams {
        manifest.teams.insert(slug.to_string(), set(logins));
    }
    manifest
}

pub fn logins(items: &[&str]) -> BTreeSet<Login> {
    set(items)
}
