//! Applier flow against an in-memory organization

mod common;

use common::{logins, manifest, Call, FakeOrg};
use teamsync_teams::{Applier, Manifest, TeamError};

#[tokio::test]
async fn test_adds_desired_org_member() {
    let org = FakeOrg::new()
        .with_members(&["alice", "bob"])
        .with_team("core", &["alice"]);
    let mut desired = manifest(&[("core", &["alice", "bob"])]);

    let report = Applier::new(&org).apply(&mut desired).await.unwrap();

    assert_eq!(report.added, vec![("core".to_string(), "bob".to_string())]);
    assert!(report.removed.is_empty());
    assert_eq!(org.mutations(), vec![Call::Add("core".into(), "bob".into())]);
    assert!(desired.invite_sent.is_empty());
}

#[tokio::test]
async fn test_removes_undesired_member() {
    let org = FakeOrg::new()
        .with_members(&["alice", "bob"])
        .with_team("core", &["alice", "bob"]);
    let mut desired = manifest(&[("core", &["alice"])]);

    let report = Applier::new(&org).apply(&mut desired).await.unwrap();

    assert!(report.added.is_empty());
    assert_eq!(report.removed, vec![("core".to_string(), "bob".to_string())]);
    assert_eq!(org.team("core"), logins(&["alice"]));
}

#[tokio::test]
async fn test_invites_non_member_without_adding() {
    let org = FakeOrg::new()
        .with_members(&["alice"])
        .with_users(&["charlie"])
        .with_team("core", &["alice"]);
    let mut desired = manifest(&[("core", &["alice", "charlie"])]);

    let report = Applier::new(&org).apply(&mut desired).await.unwrap();

    assert_eq!(report.invited, logins(&["charlie"]));
    assert!(report.added.is_empty());
    assert_eq!(org.mutations().len(), 1);
    assert!(matches!(org.mutations()[0], Call::Invite(_)));
    assert_eq!(desired.invite_sent, logins(&["charlie"]));
}

#[tokio::test]
async fn test_pending_login_is_not_reinvited() {
    let org = FakeOrg::new()
        .with_pending(&["charlie"])
        .with_team("core", &[]);
    let mut desired = manifest(&[("core", &["charlie"])]);

    let report = Applier::new(&org).apply(&mut desired).await.unwrap();

    assert!(report.is_noop());
    assert!(org.mutations().is_empty());
    assert!(!org.calls().contains(&Call::Resolve("charlie".into())));
    assert_eq!(desired.invite_sent, logins(&["charlie"]));
}

#[tokio::test]
async fn test_login_in_two_teams_is_invited_once() {
    let org = FakeOrg::new()
        .with_users(&["charlie"])
        .with_team("core", &[])
        .with_team("web", &[]);
    let mut desired = manifest(&[("core", &["charlie"]), ("web", &["charlie"])]);

    Applier::new(&org).apply(&mut desired).await.unwrap();

    let invites = org
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Invite(_) | Call::Resolve(_)))
        .count();
    assert_eq!(invites, 2, "one resolve and one invite");
}

#[tokio::test]
async fn test_conflicting_invite_is_skipped() {
    let org = FakeOrg::new()
        .with_users(&["charlie"])
        .with_conflict("charlie")
        .with_team("core", &[]);
    let mut desired = manifest(&[("core", &["charlie"])]);

    let report = Applier::new(&org).apply(&mut desired).await.unwrap();

    assert!(report.invited.is_empty());
    assert_eq!(report.skipped_invites, logins(&["charlie"]));
    assert!(desired.invite_sent.is_empty());
}

#[tokio::test]
async fn test_unknown_team_aborts_before_mutations() {
    let org = FakeOrg::new()
        .with_members(&["alice", "bob"])
        .with_team("core", &[]);
    let mut desired = manifest(&[("core", &["alice"]), ("ghost-team", &["bob"])]);

    let err = Applier::new(&org).apply(&mut desired).await.unwrap_err();

    match err {
        TeamError::UnknownTeam { slug, org } => {
            assert_eq!(slug, "ghost-team");
            assert_eq!(org, "acme");
        }
        other => panic!("expected unknown team, got {other:?}"),
    }
    assert!(org.mutations().is_empty());
}

#[tokio::test]
async fn test_unknown_user_aborts() {
    let org = FakeOrg::new().with_team("core", &[]);
    let mut desired = manifest(&[("core", &["nobody"])]);

    let err = Applier::new(&org).apply(&mut desired).await.unwrap_err();
    assert!(matches!(err, TeamError::UnknownUser(ref login) if login == "nobody"));
}

#[tokio::test]
async fn test_rejected_invitation_is_fatal() {
    let org = FakeOrg::new()
        .with_users(&["charlie"])
        .with_failing_invite("charlie", 403)
        .with_team("core", &[]);
    let mut desired = manifest(&[("core", &["charlie"])]);

    let err = Applier::new(&org).apply(&mut desired).await.unwrap_err();
    assert!(matches!(err, TeamError::InviteFailed { status: 403, .. }));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_invitation_server_error_is_a_transport_failure() {
    let org = FakeOrg::new()
        .with_users(&["charlie"])
        .with_failing_invite("charlie", 502)
        .with_team("core", &[]);
    let mut desired = manifest(&[("core", &["charlie"])]);

    let err = Applier::new(&org).apply(&mut desired).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(org.pending(), logins(&[]));
}

#[tokio::test]
async fn test_rejected_add_keeps_earlier_changes() {
    let org = FakeOrg::new()
        .with_members(&["alice", "bob"])
        .with_failing_add("bob")
        .with_team("a-team", &["old"])
        .with_team("b-team", &[]);
    let mut desired = manifest(&[("a-team", &["alice"]), ("b-team", &["bob"])]);

    let err = Applier::new(&org).apply(&mut desired).await.unwrap_err();

    assert!(matches!(
        err,
        TeamError::MutationFailed { action: "adding", status: 403, .. }
    ));
    assert_eq!(org.team("a-team"), logins(&["alice"]));
}

#[tokio::test]
async fn test_dry_run_issues_no_mutations() {
    let org = FakeOrg::new()
        .with_members(&["alice", "bob"])
        .with_users(&["charlie"])
        .with_team("core", &["bob"]);
    let mut desired = manifest(&[("core", &["alice", "charlie"])]);

    let report = Applier::new(&org)
        .with_dry_run(true)
        .apply(&mut desired)
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.added, vec![("core".to_string(), "alice".to_string())]);
    assert_eq!(report.removed, vec![("core".to_string(), "bob".to_string())]);
    assert_eq!(report.invited, logins(&["charlie"]));
    assert!(org.mutations().is_empty());
    assert!(desired.invite_sent.is_empty());
}

#[tokio::test]
async fn test_second_run_is_a_noop() {
    let org = FakeOrg::new()
        .with_members(&["alice", "bob"])
        .with_users(&["charlie"])
        .with_team("core", &["bob"]);
    let text = "teams:\n  core:\n  - alice\n  - charlie\n";

    let mut first = Manifest::parse(text).unwrap();
    Applier::new(&org).apply(&mut first).await.unwrap();
    let first_text = first.render().unwrap();

    org.clear_calls();
    let mut second = Manifest::parse(&first_text).unwrap();
    let report = Applier::new(&org).apply(&mut second).await.unwrap();

    assert!(report.is_noop());
    assert!(org.mutations().is_empty());
    assert_eq!(second.render().unwrap(), first_text);
}

#[tokio::test]
async fn test_accepted_invite_is_added_on_next_run() {
    let org = FakeOrg::new()
        .with_users(&["charlie"])
        .with_team("core", &[]);
    let mut desired = manifest(&[("core", &["charlie"])]);

    Applier::new(&org).apply(&mut desired).await.unwrap();
    assert_eq!(desired.invite_sent, logins(&["charlie"]));
    assert!(org.pending().contains("charlie"));

    org.accept_invite("charlie");
    let report = Applier::new(&org).apply(&mut desired).await.unwrap();

    assert_eq!(report.added, vec![("core".to_string(), "charlie".to_string())]);
    assert!(desired.invite_sent.is_empty());
}
