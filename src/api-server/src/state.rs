use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use userdir_authz::{
    AccessGuard, EngineConfig, InMemoryUserStore, ManagementScope, PermissionResolver, SeedData,
    StaticRoleDirectory,
};
use userdir_core::{GroupId, RoleDirectory, UserStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// User records
    pub users: Arc<dyn UserStore>,

    /// Role definitions, used to validate role codes in requests
    pub roles: Arc<dyn RoleDirectory>,

    /// Configured groups, used to validate group ids in requests
    pub groups: Arc<BTreeSet<GroupId>>,

    /// Permission guard for the user routes
    pub guard: Arc<AccessGuard>,

    /// Management scope calculator
    pub scope: Arc<ManagementScope>,

    /// Server start time for uptime calculation
    pub start_time: Instant,

    /// Application version
    pub version: String,
}

impl AppState {
    /// Build the collaborators and core components from seed data
    pub fn from_seed(config: EngineConfig, seed: SeedData) -> userdir_authz::Result<Self> {
        seed.validate()?;

        let roles: Arc<dyn RoleDirectory> = Arc::new(StaticRoleDirectory::new(seed.roles)?);
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::with_users(seed.users)?);

        let guard = AccessGuard::new(
            config,
            users.clone(),
            PermissionResolver::new(roles.clone()),
        );
        let scope = ManagementScope::new(users.clone());

        Ok(Self {
            users,
            roles,
            groups: Arc::new(seed.groups),
            guard: Arc::new(guard),
            scope: Arc::new(scope),
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
