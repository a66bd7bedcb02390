//! GitHub Integration for teamsync
//!
//! This crate exposes the organization membership API that team
//! reconciliation is written against:
//! - Paginated listing of org members, pending invitations, teams and team members
//! - Team membership mutation
//! - User id resolution and organization invitations
//! - Account existence probing with rate-limit detection

pub mod errors;
pub mod managers;
pub mod models;

pub use errors::{GitHubError, Result};
pub use managers::{
    GitHubClient, GitHubConfig, OrgClient, DEFAULT_API_URL, DEFAULT_API_VERSION, MAX_PER_PAGE,
};
pub use models::{InvitationOutcome, Login, UserId};
