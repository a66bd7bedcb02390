//! GitHub Data Models
//!
//! Only the fields teamsync reads are modelled. Everything is optional
//! because the API omits `login` for email-only invitations.

use serde::{Deserialize, Serialize};

/// A user identifier string, compared byte for byte
pub type Login = String;

/// Numeric GitHub account id
pub type UserId = u64;

/// Entry of `GET /orgs/{org}/members` and `GET /orgs/{org}/teams/{slug}/members`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub login: Option<Login>,
}

/// Entry of `GET /orgs/{org}/invitations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub login: Option<Login>,
    pub email: Option<String>,
}

/// Entry of `GET /orgs/{org}/teams`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    pub slug: Option<String>,
    pub name: Option<String>,
}

/// Body of `GET /users/{login}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Option<UserId>,
    pub login: Option<Login>,
}

/// Result of `POST /orgs/{org}/invitations`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationOutcome {
    /// Invitation issued
    Created,
    /// 422: already invited, already a member, or similar
    Conflict(String),
}

/// Keep the non-empty value of an optional identifier field
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
