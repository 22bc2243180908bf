//! Access decision point
//!
//! Checks whether an actor may perform an action requiring a permission.
//! Every check resolves the actor's permissions afresh from the current
//! store contents.

pub mod decision;
pub mod metrics;

pub use decision::{Decision, DenyReason};
pub use metrics::{EngineMetrics, MetricsCollector};

use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use userdir_core::{Permission, UserId, UserStore};

use crate::resolver::PermissionResolver;

/// Guard configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { enable_metrics: true }
    }
}

/// Permission guard
///
/// # Pipeline
///
/// ```text
/// actor id → parse → UserStore → PermissionResolver → Decision
///                                                        ↓
///                                                    [Metrics]
/// ```
pub struct AccessGuard {
    users: Arc<dyn UserStore>,
    resolver: PermissionResolver,
    metrics: Option<Arc<MetricsCollector>>,
}

impl AccessGuard {
    pub fn new(
        config: EngineConfig,
        users: Arc<dyn UserStore>,
        resolver: PermissionResolver,
    ) -> Self {
        let metrics = config
            .enable_metrics
            .then(|| Arc::new(MetricsCollector::new()));

        debug!("AccessGuard initialized with metrics={}", config.enable_metrics);

        Self {
            users,
            resolver,
            metrics,
        }
    }

    /// Decide whether `actor` may perform an action requiring `required`
    ///
    /// # Pipeline
    ///
    /// 1. No required permission: allow, whoever the actor is
    /// 2. Missing or empty actor: deny
    /// 3. Actor not an integer id: deny
    /// 4. Actor not in the store: deny
    /// 5. Allow iff the actor's effective permissions contain `required`
    pub fn authorize(&self, actor: Option<&str>, required: Option<&Permission>) -> Decision {
        let start = Instant::now();
        let decision = self.evaluate(actor, required);

        if let Some(metrics) = &self.metrics {
            metrics.record(&decision, start.elapsed());
        }

        decision
    }

    /// Metrics collector, if enabled
    pub fn metrics(&self) -> Option<&Arc<MetricsCollector>> {
        self.metrics.as_ref()
    }

    fn evaluate(&self, actor: Option<&str>, required: Option<&Permission>) -> Decision {
        let Some(required) = required else {
            return Decision::Allow;
        };

        let actor = match actor.map(str::trim) {
            Some(actor) if !actor.is_empty() => actor,
            _ => return Decision::Deny(DenyReason::MissingActor),
        };

        // `u64::from_str` also takes a leading '+'
        let parsed = actor
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| actor.parse::<UserId>().ok())
            .flatten();
        let Some(actor_id) = parsed else {
            debug!(actor, "Actor identifier is not a user id");
            return Decision::Deny(DenyReason::InvalidActorIdentifier);
        };

        let Some(user) = self.users.find_by_id(actor_id) else {
            debug!(actor_id, "Actor not found");
            return Decision::Deny(DenyReason::ActorNotFound);
        };

        let effective = self.resolver.resolve_effective_permissions(&user.roles);
        if effective.contains(required) {
            debug!(actor_id, permission = %required, "Access allowed");
            Decision::Allow
        } else {
            debug!(actor_id, permission = %required, "Permission not granted");
            Decision::Deny(DenyReason::InsufficientPermission)
        }
    }
}
