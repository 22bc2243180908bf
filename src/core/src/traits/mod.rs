//! Collaborator traits the authorization engine reads through

pub mod store;

// Re-export commonly used traits
pub use store::{RoleDirectory, UserStore};
