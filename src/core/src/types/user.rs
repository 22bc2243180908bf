//! User records and the inputs that create or replace them

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::tags::{GroupId, RoleCode};

/// Unique user identifier, assigned by the user store
pub type UserId = u64;

/// A user record as owned by the user store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub roles: BTreeSet<RoleCode>,
    pub groups: BTreeSet<GroupId>,
}

impl User {
    /// Build a record from an id and creation input
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        Self {
            id,
            name: new_user.name,
            roles: new_user.roles,
            groups: new_user.groups,
        }
    }

    pub fn has_role(&self, role: &RoleCode) -> bool {
        self.roles.contains(role)
    }

    /// True when this user belongs to at least one of `groups`
    pub fn shares_group_with(&self, groups: &BTreeSet<GroupId>) -> bool {
        !self.groups.is_disjoint(groups)
    }
}

/// Creation input; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub roles: BTreeSet<RoleCode>,
    pub groups: BTreeSet<GroupId>,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        roles: impl IntoIterator<Item = RoleCode>,
        groups: impl IntoIterator<Item = GroupId>,
    ) -> Self {
        Self {
            name: name.into(),
            roles: roles.into_iter().collect(),
            groups: groups.into_iter().collect(),
        }
    }
}

/// Partial update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeSet<RoleCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeSet<GroupId>>,
}

impl UserPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn roles(mut self, roles: impl IntoIterator<Item = RoleCode>) -> Self {
        self.roles = Some(roles.into_iter().collect());
        self
    }

    pub fn groups(mut self, groups: impl IntoIterator<Item = GroupId>) -> Self {
        self.groups = Some(groups.into_iter().collect());
        self
    }

    /// Produce the replacement record; `current` is left untouched
    pub fn apply(self, current: &User) -> User {
        User {
            id: current.id,
            name: self.name.unwrap_or_else(|| current.name.clone()),
            roles: self.roles.unwrap_or_else(|| current.roles.clone()),
            groups: self.groups.unwrap_or_else(|| current.groups.clone()),
        }
    }
}
