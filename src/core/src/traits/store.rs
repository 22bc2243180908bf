//! User store and role directory traits

use crate::error::Result;
use crate::types::{NewUser, RoleCode, RoleDefinition, User, UserId, UserPatch};

/// Owner of the user collection
///
/// Every read returns an owned snapshot. Implementations must make each call
/// observe a single consistent state of the collection, even when called from
/// many threads at once.
pub trait UserStore: Send + Sync {
    /// Get a user by ID
    fn find_by_id(&self, id: UserId) -> Option<User>;

    /// List all users in iteration order (ascending id)
    fn list(&self) -> Vec<User>;

    /// Store a new user under a freshly assigned ID
    ///
    /// Fails with [`crate::CoreError::IdsExhausted`] once every ID has been handed out.
    fn create(&self, new_user: NewUser) -> Result<User>;

    /// Replace a user with the patched record, `None` if the ID is unknown
    fn update(&self, id: UserId, patch: UserPatch) -> Option<User>;

    /// Remove a user, `false` if the ID is unknown
    fn delete(&self, id: UserId) -> bool;
}

/// Read-only lookup of role definitions by code
pub trait RoleDirectory: Send + Sync {
    /// Get the definition for a role code
    fn find_by_code(&self, code: &RoleCode) -> Option<RoleDefinition>;

    /// Whether a definition exists for the code
    fn contains(&self, code: &RoleCode) -> bool {
        self.find_by_code(code).is_some()
    }
}
