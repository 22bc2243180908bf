//! Shared types for the user directory

pub mod tags;
pub mod user;
pub mod role;

// Re-export commonly used types
pub use tags::{GroupId, Permission, RoleCode};
pub use user::{NewUser, User, UserId, UserPatch};
pub use role::RoleDefinition;
