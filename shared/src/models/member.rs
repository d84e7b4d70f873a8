//! Member Model

use serde::{Deserialize, Serialize};

/// Roster entry
///
/// Every user has a member row carrying the same id in `user_id`. A member
/// whose user is gone keeps `user_id = None` and survives only while it has
/// dues history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Outcome of a roster sync pass
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterSyncReport {
    pub created: Vec<i64>,
    pub renamed: Vec<i64>,
    pub unlinked: Vec<i64>,
    pub removed: Vec<i64>,
}

impl RosterSyncReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
            && self.renamed.is_empty()
            && self.unlinked.is_empty()
            && self.removed.is_empty()
    }
}
