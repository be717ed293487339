use serde::{Deserialize, Serialize};

/// Roles eligible for the attendance roster. Closed set: anything else is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    SubAdministrator,
    Administrator,
}

impl Role {
    /// Map a backend role key to an eligible role.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "manage" | "admin" => Some(Role::Administrator),
            "part_manage" => Some(Role::SubAdministrator),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::SubAdministrator => "sub-administrator",
            Role::Staff => "staff",
        }
    }
}

/// Raw role tags attached to a user by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub admin: bool,
    pub role_keys: Vec<String>,
}

impl RoleAssignment {
    pub fn new(admin: bool, role_keys: Vec<String>) -> Self {
        Self { admin, role_keys }
    }

    /// Highest eligible role, if any.
    pub fn eligible_role(&self) -> Option<Role> {
        if self.admin {
            return Some(Role::Administrator);
        }
        self.role_keys.iter().filter_map(|k| Role::from_key(k)).max()
    }
}
