use super::UserId;
use serde::{Deserialize, Serialize};

/// Identity data returned by the profile lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub user_name: String,
    pub legal_name: Option<String>,
    pub nick_name: Option<String>,
    pub dept_id: Option<i64>,
}

impl Profile {
    /// Legal name, then nickname, then account name.
    pub fn display_name(&self) -> String {
        [&self.legal_name, &self.nick_name]
            .into_iter()
            .flatten()
            .find(|n| !n.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| self.user_name.clone())
    }
}

/// Lightweight user listing entry used for scope filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: UserId,
    pub user_name: String,
    pub dept_id: Option<i64>,
}

/// Who performs a check-in/check-out on a volunteer's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: UserId,
    pub name: String,
}

impl Operator {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
