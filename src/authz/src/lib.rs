//! Authorization core for the user directory
//!
//! - [`PermissionResolver`]: role codes to effective permissions
//! - [`AccessGuard`]: allow/deny for an actor and a required permission
//! - [`ManagementScope`]: users a manager may see through shared groups
//!
//! In-memory implementations of the collaborator traits and seed loading
//! live in [`store`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use userdir_authz::{
//!     AccessGuard, Decision, EngineConfig, InMemoryUserStore, PermissionResolver, SeedData,
//!     StaticRoleDirectory,
//! };
//! use userdir_core::Permission;
//!
//! let seed = SeedData::builtin();
//! let roles = Arc::new(StaticRoleDirectory::new(seed.roles).unwrap());
//! let users = Arc::new(InMemoryUserStore::with_users(seed.users).unwrap());
//! let guard = AccessGuard::new(EngineConfig::default(), users, PermissionResolver::new(roles));
//!
//! assert_eq!(guard.authorize(Some("1"), Some(&Permission::CREATE)), Decision::Allow);
//! assert!(!guard.authorize(Some("6"), Some(&Permission::CREATE)).is_allowed());
//! ```

pub mod engine;
pub mod error;
pub mod management;
pub mod resolver;
pub mod store;

pub use engine::{AccessGuard, Decision, DenyReason, EngineConfig, EngineMetrics, MetricsCollector};
pub use error::{AuthzError, Result};
pub use management::ManagementScope;
pub use resolver::PermissionResolver;
pub use store::{InMemoryUserStore, SeedData, StaticRoleDirectory};
