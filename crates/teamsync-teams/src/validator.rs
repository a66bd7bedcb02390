/// Pre-merge validation of manifest logins
use crate::error::{Result, TeamError};
use crate::manifest::Manifest;
use std::collections::BTreeSet;
use teamsync_github::{Login, OrgClient};
use tracing::{error, info, warn};

/// Classification of every desired login
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub checked: BTreeSet<Login>,
    /// Logins with no matching account
    pub invalid: Vec<Login>,
    /// Existing accounts that are not org members yet
    pub non_members: Vec<Login>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Fail with every invalid login, or hand the report back
    pub fn into_result(self) -> Result<Self> {
        if self.invalid.is_empty() {
            Ok(self)
        } else {
            Err(TeamError::InvalidLogins(self.invalid))
        }
    }
}

/// Checks that manifest logins exist and reports which are not org members
pub struct Validator<'a, C: OrgClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: OrgClient + ?Sized> Validator<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Probe every desired login in lexicographic order
    ///
    /// Does not fail on invalid logins; call [`ValidationReport::into_result`]
    /// for that. Probe failures such as an exhausted rate limit abort.
    pub async fn validate(&self, manifest: &Manifest) -> Result<ValidationReport> {
        let org_members = self.client.list_org_members().await?;
        let mut report = ValidationReport {
            checked: manifest.desired_all(),
            ..ValidationReport::default()
        };

        for login in &report.checked {
            if !self.client.user_exists(login).await? {
                error!(login = %login, "GitHub user does not exist");
                report.invalid.push(login.clone());
            } else if !org_members.contains(login) {
                warn!(login = %login, org = %self.client.org(), "User is not an organization member");
                report.non_members.push(login.clone());
            }
        }

        info!(
            checked = report.checked.len(),
            invalid = report.invalid.len(),
            non_members = report.non_members.len(),
            "Validation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result_lists_all_invalid() {
        let report = ValidationReport {
            invalid: vec!["ghost".to_string(), "invaliduser".to_string()],
            ..ValidationReport::default()
        };
        assert!(!report.is_valid());
        match report.into_result() {
            Err(TeamError::InvalidLogins(logins)) => assert_eq!(logins, vec!["ghost", "invaliduser"]),
            other => panic!("expected invalid logins, got {other:?}"),
        }
    }

    #[test]
    fn test_non_members_do_not_fail() {
        let report = ValidationReport {
            non_members: vec!["newbie".to_string()],
            ..ValidationReport::default()
        };
        assert!(report.into_result().is_ok());
    }
}
