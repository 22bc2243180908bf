//! Access decisions and deny reasons

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// The deny reason, `None` for an allow
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }
}

/// Why a guard check was denied
///
/// The display text is meant for humans and logs; callers should match on
/// the variant rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No actor identifier was supplied
    MissingActor,

    /// The actor identifier is not an integer user id
    InvalidActorIdentifier,

    /// No user exists with the actor's id
    ActorNotFound,

    /// The actor's roles do not grant the required permission
    InsufficientPermission,
}

impl DenyReason {
    pub const ALL: [DenyReason; 4] = [
        DenyReason::MissingActor,
        DenyReason::InvalidActorIdentifier,
        DenyReason::ActorNotFound,
        DenyReason::InsufficientPermission,
    ];

    /// Stable snake_case label, used for metrics
    pub fn label(&self) -> &'static str {
        match self {
            DenyReason::MissingActor => "missing_actor",
            DenyReason::InvalidActorIdentifier => "invalid_actor_identifier",
            DenyReason::ActorNotFound => "actor_not_found",
            DenyReason::InsufficientPermission => "insufficient_permission",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            DenyReason::MissingActor => "You do not have permissions",
            DenyReason::InvalidActorIdentifier => "Actor identifier is not a valid user id",
            DenyReason::ActorNotFound => "Actor does not exist",
            DenyReason::InsufficientPermission => {
                "Actor does not have the required permission"
            }
        };
        f.write_str(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_allow_decision() {
        let decision = Decision::Allow;
        assert!(decision.is_allowed());
        assert_eq!(decision.deny_reason(), None);
    }

    #[test]
    fn test_deny_decision() {
        let decision = Decision::Deny(DenyReason::ActorNotFound);
        assert!(!decision.is_allowed());
        assert_eq!(decision.deny_reason(), Some(DenyReason::ActorNotFound));
    }

    #[test]
    fn test_deny_reasons_are_distinct_and_non_empty() {
        let messages: HashSet<String> = DenyReason::ALL.iter().map(|r| r.to_string()).collect();
        assert_eq!(messages.len(), DenyReason::ALL.len());
        assert!(messages.iter().all(|m| !m.is_empty()));

        let labels: HashSet<&str> = DenyReason::ALL.iter().map(|r| r.label()).collect();
        assert_eq!(labels.len(), DenyReason::ALL.len());
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(Decision::Deny(DenyReason::MissingActor)).unwrap();
        assert_eq!(json["decision"], "deny");
        assert_eq!(json["reason"], "missing_actor");

        let json = serde_json::to_value(Decision::Allow).unwrap();
        assert_eq!(json["decision"], "allow");
    }
}
