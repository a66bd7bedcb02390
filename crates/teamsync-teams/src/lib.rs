/// Team membership reconciliation
///
/// This crate keeps a declarative `teams.yaml` manifest and an organization's
/// team membership in agreement, in both directions:
/// - [`Applier`]: manifest to organization (adds, removes, invitations)
/// - [`Exporter`]: organization to manifest, keeping pending invitees
/// - [`Validator`]: existence and membership checks before a manifest is merged
///
/// The set arithmetic ([`reconcile`], [`compute_invite_sent`],
/// [`preserve_pending`]) is pure; all remote access goes through
/// [`teamsync_github::OrgClient`].

pub mod applier;
pub mod document;
pub mod error;
pub mod exporter;
pub mod invites;
pub mod manifest;
pub mod reconcile;
pub mod snapshot;
pub mod validator;

// Re-export public types
pub use applier::{Applier, ApplyReport, MembershipChange};
pub use document::{DocumentField, YamlDocument};
pub use error::{Result, TeamError};
pub use exporter::{preserve_pending, ExportReport, Exporter};
pub use invites::{compute_invite_sent, InviteLedger, InviteOutcome};
pub use manifest::{
    normalize_logins, write_if_changed, Manifest, TeamMap, INVITE_SENT_COMMENT, INVITE_SENT_KEY,
    TEAMS_KEY,
};
pub use reconcile::{reconcile, TeamPlan};
pub use snapshot::OrgSnapshot;
pub use validator::{ValidationReport, Validator};
