//! Current operator context

use serde::Serialize;
use shared::models::{User, UserRole};

use super::permissions::role_permissions;

/// Request header carrying the operator's user id
pub const OPERATOR_HEADER: &str = "x-operator-id";

/// Operator resolved from [`OPERATOR_HEADER`]
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: UserRole,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            role: user.role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check whether the operator's role grants `permission`
    ///
    /// `"all"` grants everything.
    pub fn has_permission(&self, permission: &str) -> bool {
        role_permissions(self.role)
            .iter()
            .any(|granted| *granted == "all" || *granted == permission)
    }
}
