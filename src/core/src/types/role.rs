//! Role definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::tags::{Permission, RoleCode};
use crate::error::{CoreError, Result};

/// A named bundle of permissions, looked up by its code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Display name (e.g., "Admin")
    pub name: String,

    /// Code users reference in their `roles`
    pub code: RoleCode,

    /// Permissions granted to holders of this role
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
}

impl RoleDefinition {
    /// Create a new role definition
    pub fn new(
        name: impl Into<String>,
        code: RoleCode,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        Self {
            name: name.into(),
            code,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Check that the definition can be loaded into a role directory
    ///
    /// An empty permission set is valid: such a role grants nothing.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid(format!(
                "role '{}' has an empty name",
                self.code
            )));
        }

        if self.code.as_str().is_empty() {
            return Err(CoreError::invalid(format!(
                "role '{}' has an empty code",
                self.name
            )));
        }

        Ok(())
    }

    pub fn grants(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }
}
