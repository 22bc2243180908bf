//! Permission resolution from role codes

use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;
use userdir_core::{Permission, RoleCode, RoleDirectory};

/// Maps role codes to the union of the permissions their definitions grant
#[derive(Clone)]
pub struct PermissionResolver {
    roles: Arc<dyn RoleDirectory>,
}

impl PermissionResolver {
    pub fn new(roles: Arc<dyn RoleDirectory>) -> Self {
        Self { roles }
    }

    /// Effective permissions for a set of role codes
    ///
    /// Codes without a definition are skipped and contribute nothing. This
    /// leniency means a typo in a user's roles silently grants less rather
    /// than failing; it may not have been intended, so keep it visible here.
    pub fn resolve_effective_permissions<'a, I>(&self, role_codes: I) -> HashSet<Permission>
    where
        I: IntoIterator<Item = &'a RoleCode>,
    {
        let mut effective = HashSet::new();

        for code in role_codes {
            match self.roles.find_by_code(code) {
                Some(definition) => effective.extend(definition.permissions),
                None => trace!(role = %code, "Skipping unknown role code"),
            }
        }

        effective
    }
}
