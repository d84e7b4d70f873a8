//! Roster reconciliation
//!
//! Every user appears as a member carrying the user's display name. A member
//! whose user is gone is kept (unlinked) only while it has dues history.

use std::collections::{HashMap, HashSet};

use shared::models::{Member, User};

/// Changes needed to bring the member table in line with the users
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterPlan {
    /// (user_id, name) of users without a member
    pub create: Vec<(i64, String)>,
    /// (member_id, new name) of members whose user was renamed
    pub rename: Vec<(i64, String)>,
    /// Members whose user is gone but which have dues history
    pub unlink: Vec<i64>,
    /// Members without a user and without dues history
    pub remove: Vec<i64>,
}

impl RosterPlan {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.rename.is_empty()
            && self.unlink.is_empty()
            && self.remove.is_empty()
    }
}

/// Plan a roster sync
///
/// `members_with_dues` holds the ids of members that have at least one dues
/// record.
pub fn plan_roster_sync(
    users: &[User],
    members: &[Member],
    members_with_dues: &HashSet<i64>,
) -> RosterPlan {
    let mut plan = RosterPlan::default();
    let by_user: HashMap<i64, &Member> = members
        .iter()
        .filter_map(|m| m.user_id.map(|uid| (uid, m)))
        .collect();
    let user_ids: HashSet<i64> = users.iter().map(|u| u.id).collect();

    for user in users {
        match by_user.get(&user.id) {
            None => plan.create.push((user.id, user.display_name.clone())),
            Some(member) if member.name != user.display_name => {
                plan.rename.push((member.id, user.display_name.clone()))
            }
            Some(_) => {}
        }
    }

    for member in members {
        let orphaned = match member.user_id {
            Some(uid) => !user_ids.contains(&uid),
            None => true,
        };
        if !orphaned {
            continue;
        }
        if members_with_dues.contains(&member.id) {
            if member.user_id.is_some() {
                plan.unlink.push(member.id);
            }
        } else {
            plan.remove.push(member.id);
        }
    }

    plan
}
