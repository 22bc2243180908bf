//! Prometheus metrics collection for guard observability

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;

use super::decision::{Decision, DenyReason};

/// Guard decision metrics
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Total number of guard checks
    pub total_requests: u64,

    /// Number of allowed decisions
    pub allowed_decisions: u64,

    /// Number of denied decisions
    pub denied_decisions: u64,

    /// Denials broken down by reason
    pub denials_by_reason: HashMap<DenyReason, u64>,

    /// Average decision latency
    pub avg_latency_ms: f64,
}

impl EngineMetrics {
    /// Calculate allow rate
    pub fn allow_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.allowed_decisions as f64 / self.total_requests as f64
        }
    }

    pub fn denials_for(&self, reason: DenyReason) -> u64 {
        self.denials_by_reason.get(&reason).copied().unwrap_or(0)
    }
}

/// Metrics collector with Prometheus-compatible export
#[derive(Debug, Default)]
pub struct MetricsCollector {
    metrics: RwLock<EngineMetrics>,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a guard decision and how long it took
    pub fn record(&self, decision: &Decision, latency: Duration) {
        let mut metrics = self.metrics.write();
        metrics.total_requests += 1;

        match decision {
            Decision::Allow => metrics.allowed_decisions += 1,
            Decision::Deny(reason) => {
                metrics.denied_decisions += 1;
                *metrics.denials_by_reason.entry(*reason).or_insert(0) += 1;
            }
        }

        // Running mean
        let latency_ms = latency.as_secs_f64() * 1000.0;
        let n = metrics.total_requests as f64;
        metrics.avg_latency_ms += (latency_ms - metrics.avg_latency_ms) / n;
    }

    /// Get current metrics snapshot
    pub fn get_metrics(&self) -> EngineMetrics {
        self.metrics.read().clone()
    }

    /// Reset all metrics
    pub fn reset(&self) {
        *self.metrics.write() = EngineMetrics::default();
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self) -> String {
        let metrics = self.metrics.read();

        let mut out = format!(
            r#"# HELP userdir_guard_requests_total Total number of guard checks
# TYPE userdir_guard_requests_total counter
userdir_guard_requests_total {}

# HELP userdir_guard_allowed_total Number of allowed decisions
# TYPE userdir_guard_allowed_total counter
userdir_guard_allowed_total {}

# HELP userdir_guard_denied_total Number of denied decisions
# TYPE userdir_guard_denied_total counter
userdir_guard_denied_total {}

# HELP userdir_guard_denials_total Denied decisions by reason
# TYPE userdir_guard_denials_total counter
"#,
            metrics.total_requests, metrics.allowed_decisions, metrics.denied_decisions,
        );

        for reason in DenyReason::ALL {
            out.push_str(&format!(
                "userdir_guard_denials_total{{reason=\"{}\"}} {}\n",
                reason.label(),
                metrics.denials_for(reason)
            ));
        }

        out.push_str(&format!(
            r#"
# HELP userdir_guard_latency_seconds_avg Average decision latency
# TYPE userdir_guard_latency_seconds_avg gauge
userdir_guard_latency_seconds_avg {}
"#,
            metrics.avg_latency_ms / 1000.0
        ));

        out
    }
}
