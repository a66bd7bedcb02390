/// Set arithmetic between desired and actual team membership
use std::collections::BTreeSet;
use teamsync_github::Login;

/// Changes needed to bring one team to its desired membership
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPlan {
    /// Desired org members not yet on the team
    pub to_add: BTreeSet<Login>,
    /// Team members no longer desired
    pub to_remove: BTreeSet<Login>,
}

impl TeamPlan {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Compute additions and removals for one team
///
/// Only organization members are ever added; everyone else in `desired` is
/// left to the invitation step. Removal does not depend on org membership.
pub fn reconcile(
    desired: &BTreeSet<Login>,
    current: &BTreeSet<Login>,
    org_members: &BTreeSet<Login>,
) -> TeamPlan {
    let to_add = desired
        .iter()
        .filter(|login| org_members.contains(*login) && !current.contains(*login))
        .cloned()
        .collect();
    let to_remove = current.difference(desired).cloned().collect();
    TeamPlan { to_add, to_remove }
}
