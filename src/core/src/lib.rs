//! # Userdir Core
//!
//! Shared data model, collaborator traits, and error handling for the user
//! directory. The authorization engine and the API server both build on these
//! types; nothing here knows about HTTP or storage.

pub mod types;
pub mod traits;
pub mod error;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::{RoleDirectory, UserStore};
pub use types::{GroupId, NewUser, Permission, RoleCode, RoleDefinition, User, UserId, UserPatch};
