//! In-memory collaborators: the user store and the role directory

pub mod seed;

pub use seed::SeedData;

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use userdir_core::{
    CoreError, NewUser, RoleCode, RoleDefinition, RoleDirectory, User, UserId, UserPatch,
    UserStore,
};

use crate::error::{AuthzError, Result};

#[derive(Debug)]
struct UserTable {
    users: BTreeMap<UserId, User>,
    /// `None` once `UserId::MAX` has been assigned
    next_id: Option<UserId>,
}

impl UserTable {
    fn empty() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

/// User store backed by an ordered map behind a single lock
///
/// Ids are assigned from a counter that only moves forward, so an id freed by
/// a delete is never handed out again.
#[derive(Debug)]
pub struct InMemoryUserStore {
    table: RwLock<UserTable>,
}

impl InMemoryUserStore {
    /// Create an empty store; the first id is 1
    pub fn new() -> Self {
        Self {
            table: RwLock::new(UserTable::empty()),
        }
    }

    /// Create a store holding `users`, rejecting duplicate ids
    ///
    /// `UserId::MAX` is rejected: no id would be left above it for new users.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Result<Self> {
        let mut table = UserTable::empty();

        for user in users {
            let id = user.id;
            let Some(after) = id.checked_add(1) else {
                return Err(AuthzError::InvalidSeed(format!("user id {id} is out of range")));
            };
            if table.users.insert(id, user).is_some() {
                return Err(CoreError::duplicate(format!("user id {id}")).into());
            }
            table.next_id = table.next_id.max(Some(after));
        }

        debug!(count = table.users.len(), next_id = ?table.next_id, "User store seeded");

        Ok(Self {
            table: RwLock::new(table),
        })
    }

    pub fn len(&self) -> usize {
        self.table.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_id(&self, id: UserId) -> Option<User> {
        self.table.read().users.get(&id).cloned()
    }

    fn list(&self) -> Vec<User> {
        self.table.read().users.values().cloned().collect()
    }

    fn create(&self, new_user: NewUser) -> userdir_core::Result<User> {
        let mut table = self.table.write();
        let id = table.next_id.ok_or(CoreError::IdsExhausted)?;
        table.next_id = id.checked_add(1);

        let user = User::from_new(id, new_user);
        table.users.insert(id, user.clone());
        debug!(user_id = id, "User created");
        Ok(user)
    }

    fn update(&self, id: UserId, patch: UserPatch) -> Option<User> {
        let mut table = self.table.write();
        let current = table.users.get(&id)?;
        let updated = patch.apply(current);
        table.users.insert(id, updated.clone());
        debug!(user_id = id, "User updated");
        Some(updated)
    }

    fn delete(&self, id: UserId) -> bool {
        let removed = self.table.write().users.remove(&id).is_some();
        if removed {
            debug!(user_id = id, "User deleted");
        }
        removed
    }
}

/// Role directory loaded once from definitions and read-only afterwards
#[derive(Debug, Clone)]
pub struct StaticRoleDirectory {
    roles: HashMap<RoleCode, RoleDefinition>,
}

impl StaticRoleDirectory {
    /// Build the directory, validating each definition
    ///
    /// Two definitions with the same code are a configuration error.
    pub fn new(definitions: impl IntoIterator<Item = RoleDefinition>) -> Result<Self> {
        let mut roles = HashMap::new();

        for definition in definitions {
            definition.validate()?;
            let code = definition.code.clone();
            if roles.insert(code.clone(), definition).is_some() {
                return Err(CoreError::duplicate(format!("role code '{code}'")).into());
            }
        }

        Ok(Self { roles })
    }

    /// All definitions, ordered by code
    pub fn definitions(&self) -> Vec<RoleDefinition> {
        let mut definitions: Vec<RoleDefinition> = self.roles.values().cloned().collect();
        definitions.sort_by(|a, b| a.code.cmp(&b.code));
        definitions
    }
}

impl RoleDirectory for StaticRoleDirectory {
    fn find_by_code(&self, code: &RoleCode) -> Option<RoleDefinition> {
        self.roles.get(code).cloned()
    }

    fn contains(&self, code: &RoleCode) -> bool {
        self.roles.contains_key(code)
    }
}
