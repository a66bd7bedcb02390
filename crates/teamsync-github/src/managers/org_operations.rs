//! Organization and team membership operations

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::errors::{GitHubError, Result};
use crate::managers::github_manager::{check, is_rate_limited, GitHubClient};
use crate::models::{
    non_empty, Invitation, InvitationOutcome, Login, Member, TeamSummary, UserId, UserRecord,
};

/// The slice of the organization API that team reconciliation depends on
///
/// Every call is issued sequentially by the caller; implementations need not
/// support concurrent use beyond `Send + Sync`.
#[async_trait]
pub trait OrgClient: Send + Sync {
    /// Organization name, for messages
    fn org(&self) -> &str;

    /// Logins of active organization members
    async fn list_org_members(&self) -> Result<BTreeSet<Login>>;

    /// Logins with a pending organization invitation
    async fn list_pending_invites(&self) -> Result<BTreeSet<Login>>;

    /// Slugs of every team in the organization
    async fn list_team_slugs(&self) -> Result<BTreeSet<String>>;

    /// Current members of one team
    async fn list_team_members(&self, slug: &str) -> Result<BTreeSet<Login>>;

    /// Add an organization member to a team
    async fn add_team_member(&self, slug: &str, login: &str) -> Result<()>;

    /// Remove a user from a team
    async fn remove_team_member(&self, slug: &str, login: &str) -> Result<()>;

    /// Resolve a login to its numeric id; `NotFound` when the account does not exist
    async fn resolve_user_id(&self, login: &str) -> Result<UserId>;

    /// Invite a user to the organization
    async fn create_invitation(&self, user_id: UserId) -> Result<InvitationOutcome>;

    /// Probe whether an account exists
    async fn user_exists(&self, login: &str) -> Result<bool>;
}

fn membership_path(slug: &str, login: &str) -> String {
    format!(
        "teams/{}/memberships/{}",
        urlencoding::encode(slug),
        urlencoding::encode(login)
    )
}

#[async_trait]
impl OrgClient for GitHubClient {
    fn org(&self) -> &str {
        self.org_name()
    }

    async fn list_org_members(&self) -> Result<BTreeSet<Login>> {
        let members: Vec<Member> = self.paginate(&self.org_url("members")).await?;
        Ok(members.into_iter().filter_map(|m| non_empty(m.login)).collect())
    }

    async fn list_pending_invites(&self) -> Result<BTreeSet<Login>> {
        let invites: Vec<Invitation> = self.paginate(&self.org_url("invitations")).await?;
        Ok(invites.into_iter().filter_map(|i| non_empty(i.login)).collect())
    }

    async fn list_team_slugs(&self) -> Result<BTreeSet<String>> {
        let teams: Vec<TeamSummary> = self.paginate(&self.org_url("teams")).await?;
        Ok(teams.into_iter().filter_map(|t| non_empty(t.slug)).collect())
    }

    async fn list_team_members(&self, slug: &str) -> Result<BTreeSet<Login>> {
        let url = self.org_url(&format!("teams/{}/members", urlencoding::encode(slug)));
        let members: Vec<Member> = self.paginate(&url).await?;
        Ok(members.into_iter().filter_map(|m| non_empty(m.login)).collect())
    }

    async fn add_team_member(&self, slug: &str, login: &str) -> Result<()> {
        let url = self.org_url(&membership_path(slug, login));
        check(self.http().put(&url).await?)?;
        Ok(())
    }

    async fn remove_team_member(&self, slug: &str, login: &str) -> Result<()> {
        let url = self.org_url(&membership_path(slug, login));
        check(self.http().delete(&url).await?)?;
        Ok(())
    }

    async fn resolve_user_id(&self, login: &str) -> Result<UserId> {
        let response = self.http().get(&self.user_url(login)).await?;
        if response.status().as_u16() == 404 {
            return Err(GitHubError::not_found(login));
        }
        let user: UserRecord = check(response)?.json()?;
        match user.id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(GitHubError::not_found(login)),
        }
    }

    async fn create_invitation(&self, user_id: UserId) -> Result<InvitationOutcome> {
        let response = self
            .http()
            .post_json(&self.org_url("invitations"), json!({ "invitee_id": user_id }))
            .await?;

        match response.status().as_u16() {
            201 => Ok(InvitationOutcome::Created),
            422 => {
                let message = response
                    .json::<serde_json::Value>()
                    .ok()
                    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                    .unwrap_or_else(|| response.text().to_string());
                debug!(user_id, %message, "Invitation conflict");
                Ok(InvitationOutcome::Conflict(message))
            }
            status => {
                let response = check(response)?;
                Err(GitHubError::api_error(
                    status,
                    format!("unexpected invitation response: {}", response.text()),
                ))
            }
        }
    }

    async fn user_exists(&self, login: &str) -> Result<bool> {
        let response = self.http().get(&self.user_url(login)).await?;
        match response.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ if is_rate_limited(&response) => Err(GitHubError::RateLimitExceeded),
            _ => check(response).map(|_| true),
        }
    }
}
