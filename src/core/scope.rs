use crate::models::{UserId, UserSummary};
use serde::Serialize;
use tracing::debug;

/// Organisational scope of the person viewing the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RosterScope {
    /// Top-level administrators see every user.
    All,
    /// School administrators and staff see their own department.
    School { dept_id: i64 },
    /// Plain staff see only themselves.
    SelfOnly { user_id: UserId },
}

impl RosterScope {
    pub fn admits(&self, user: &UserSummary) -> bool {
        match self {
            RosterScope::All => true,
            RosterScope::School { dept_id } => user.dept_id == Some(*dept_id),
            RosterScope::SelfOnly { user_id } => user.user_id == *user_id,
        }
    }

    /// Candidate ids in listing order.
    pub fn select(&self, users: &[UserSummary]) -> Vec<UserId> {
        let selected: Vec<UserId> = users
            .iter()
            .filter(|u| self.admits(u))
            .map(|u| u.user_id)
            .collect();
        debug!(scope = ?self, listed = users.len(), selected = selected.len(), "candidates selected");
        selected
    }
}
