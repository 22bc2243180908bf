//! Seed data: role definitions, known groups and initial users

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::info;
use userdir_core::{GroupId, Permission, RoleCode, RoleDefinition, User, UserId};

use crate::error::{AuthzError, Result};

/// Startup configuration for the role directory and user store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedData {
    pub roles: Vec<RoleDefinition>,

    #[serde(default)]
    pub groups: BTreeSet<GroupId>,

    #[serde(default)]
    pub users: Vec<User>,
}

impl SeedData {
    /// Default directory: three roles, two groups, six users
    pub fn builtin() -> Self {
        let roles = vec![
            RoleDefinition::new(
                "Admin",
                RoleCode::ADMIN,
                [
                    Permission::CREATE,
                    Permission::VIEW,
                    Permission::EDIT,
                    Permission::DELETE,
                ],
            ),
            RoleDefinition::new("Personal", RoleCode::PERSONAL, []),
            RoleDefinition::new("Viewer", RoleCode::VIEWER, [Permission::VIEW]),
        ];

        let user = |id, name: &str, roles: &[RoleCode], groups: &[GroupId]| User {
            id,
            name: name.to_string(),
            roles: roles.iter().cloned().collect(),
            groups: groups.iter().cloned().collect(),
        };

        let users = vec![
            user(
                1,
                "John Doe",
                &[RoleCode::ADMIN, RoleCode::PERSONAL],
                &[GroupId::GROUP_1, GroupId::GROUP_2],
            ),
            user(
                2,
                "Grabriel Monroe",
                &[RoleCode::PERSONAL],
                &[GroupId::GROUP_1, GroupId::GROUP_2],
            ),
            user(3, "Alex Xavier", &[RoleCode::PERSONAL], &[GroupId::GROUP_2]),
            user(
                4,
                "Jarvis Khan",
                &[RoleCode::ADMIN, RoleCode::PERSONAL],
                &[GroupId::GROUP_2],
            ),
            user(
                5,
                "Martines Polok",
                &[RoleCode::ADMIN, RoleCode::PERSONAL],
                &[GroupId::GROUP_1],
            ),
            user(
                6,
                "Gabriela Wozniak",
                &[RoleCode::VIEWER, RoleCode::PERSONAL],
                &[GroupId::GROUP_1],
            ),
        ];

        Self {
            roles,
            groups: BTreeSet::from([GroupId::GROUP_1, GroupId::GROUP_2]),
            users,
        }
    }

    /// Parse and validate seed data from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let seed: SeedData = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Read, parse and validate a seed file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let seed = Self::from_json_str(&contents)?;

        info!(
            path = %path.display(),
            roles = seed.roles.len(),
            groups = seed.groups.len(),
            users = seed.users.len(),
            "Loaded seed file"
        );

        Ok(seed)
    }

    /// Check the load rules: role codes and user ids are unique, and no
    /// seeded user holds `UserId::MAX`
    pub fn validate(&self) -> Result<()> {
        let mut codes = HashSet::new();
        for role in &self.roles {
            role.validate()?;
            if !codes.insert(&role.code) {
                return Err(AuthzError::InvalidSeed(format!(
                    "duplicate role code '{}'",
                    role.code
                )));
            }
        }

        let mut ids = HashSet::new();
        for user in &self.users {
            if user.id == UserId::MAX {
                return Err(AuthzError::InvalidSeed(format!(
                    "user id {} is out of range",
                    user.id
                )));
            }
            if !ids.insert(user.id) {
                return Err(AuthzError::InvalidSeed(format!(
                    "duplicate user id {}",
                    user.id
                )));
            }
        }

        Ok(())
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self::builtin()
    }
}
