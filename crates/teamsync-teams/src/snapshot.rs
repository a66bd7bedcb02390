/// Per-run snapshot of remote organization state
use crate::error::Result;
use crate::manifest::TeamMap;
use std::collections::BTreeSet;
use teamsync_github::{Login, OrgClient};
use tracing::info;

/// Remote state fetched once at the start of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgSnapshot {
    pub org_members: BTreeSet<Login>,
    pub pending: BTreeSet<Login>,
    pub team_slugs: BTreeSet<String>,
    /// Live members per team; only filled by [`OrgSnapshot::fetch_with_teams`]
    pub teams: TeamMap,
}

impl OrgSnapshot {
    /// Fetch org members, pending invitations and team slugs
    pub async fn fetch_membership<C>(client: &C) -> Result<Self>
    where
        C: OrgClient + ?Sized,
    {
        let org_members = client.list_org_members().await?;
        let pending = client.list_pending_invites().await?;
        let team_slugs = client.list_team_slugs().await?;
        info!(
            org = %client.org(),
            members = org_members.len(),
            pending = pending.len(),
            teams = team_slugs.len(),
            "Fetched organization snapshot"
        );
        Ok(Self {
            org_members,
            pending,
            team_slugs,
            teams: TeamMap::new(),
        })
    }

    /// Like [`OrgSnapshot::fetch_membership`], plus the members of every team
    pub async fn fetch_with_teams<C>(client: &C) -> Result<Self>
    where
        C: OrgClient + ?Sized,
    {
        let mut snapshot = Self::fetch_membership(client).await?;
        for slug in &snapshot.team_slugs {
            let members = client.list_team_members(slug).await?;
            snapshot.teams.insert(slug.clone(), members);
        }
        Ok(snapshot)
    }
}
