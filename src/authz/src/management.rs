//! Management scope: which users a manager may see
//!
//! A user manages another when the manager holds [`RoleCode::ADMIN`] and the
//! two share at least one group. The relation is neither transitive nor
//! symmetric, and nobody manages themselves.

use std::sync::Arc;
use tracing::debug;
use userdir_core::{RoleCode, User, UserId, UserStore};

/// Computes the set of users a manager candidate manages
#[derive(Clone)]
pub struct ManagementScope {
    users: Arc<dyn UserStore>,
}

impl ManagementScope {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Users managed by `manager_id`, in store order
    ///
    /// Empty when the manager does not exist or is not an admin. The manager
    /// and candidates come from one listing, so the result always reflects a
    /// single store state.
    pub fn find_managed_users(&self, manager_id: UserId) -> Vec<User> {
        let snapshot = self.users.list();

        let Some(manager) = snapshot.iter().find(|user| user.id == manager_id) else {
            debug!(manager_id, "Manager not found");
            return Vec::new();
        };

        if !manager.has_role(&RoleCode::ADMIN) {
            debug!(manager_id, "Manager is not an admin");
            return Vec::new();
        }

        let groups = manager.groups.clone();
        let managed: Vec<User> = snapshot
            .into_iter()
            .filter(|user| user.id != manager_id && user.shares_group_with(&groups))
            .collect();

        debug!(manager_id, count = managed.len(), "Resolved management scope");
        managed
    }
}
