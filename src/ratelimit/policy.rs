//! Rate limit policies.
//!
//! A policy is the immutable pair of a request limit and a window
//! length. The service runs three of them, one per [`Scope`], with the
//! platform's stock values as defaults; a configuration file can
//! override any of them.

use serde::{Deserialize, Serialize};

use crate::error::{GatehouseError, Result};

use super::key::Scope;

/// A rate-limiting configuration: maximum requests per fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Maximum requests admitted within one window.
    pub limit: u32,
    /// Window length in milliseconds.
    pub window_ms: u64,
}

impl Policy {
    /// Create a policy.
    pub const fn new(limit: u32, window_ms: u64) -> Self {
        Self { limit, window_ms }
    }

    /// Both values must be positive for the limiter to be meaningful.
    pub fn validate(&self, scope: Scope) -> Result<()> {
        if self.limit == 0 {
            return Err(GatehouseError::Config(format!(
                "{} policy limit must be positive",
                scope
            )));
        }
        if self.window_ms == 0 {
            return Err(GatehouseError::Config(format!(
                "{} policy window must be positive",
                scope
            )));
        }
        Ok(())
    }
}

/// The full set of policies the service enforces, one per scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySet {
    /// Chat policy
    #[serde(default = "default_chat_policy")]
    pub chat: Policy,
    /// Booking policy
    #[serde(default = "default_booking_policy")]
    pub booking: Policy,
    /// Auth policy
    #[serde(default = "default_auth_policy")]
    pub auth: Policy,
}

impl Default for PolicySet {
    fn default() -> Self {
        Self {
            chat: default_chat_policy(),
            booking: default_booking_policy(),
            auth: default_auth_policy(),
        }
    }
}

fn default_chat_policy() -> Policy {
    Policy::new(60, 60_000)
}

fn default_booking_policy() -> Policy {
    Policy::new(10, 60_000)
}

fn default_auth_policy() -> Policy {
    Policy::new(5, 60_000)
}

impl PolicySet {
    /// The policy for a scope.
    pub fn policy_for(&self, scope: Scope) -> Policy {
        match scope {
            Scope::Chat => self.chat,
            Scope::Booking => self.booking,
            Scope::Auth => self.auth,
        }
    }

    /// Validate every policy in the set.
    pub fn validate(&self) -> Result<()> {
        for scope in Scope::ALL {
            self.policy_for(scope).validate(scope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policies_match_platform_values() {
        let policies = PolicySet::default();
        assert_eq!(policies.chat, Policy::new(60, 60_000));
        assert_eq!(policies.booking, Policy::new(10, 60_000));
        assert_eq!(policies.auth, Policy::new(5, 60_000));
    }

    #[test]
    fn test_policy_for_each_scope() {
        let policies = PolicySet::default();
        assert_eq!(policies.policy_for(Scope::Chat), policies.chat);
        assert_eq!(policies.policy_for(Scope::Booking), policies.booking);
        assert_eq!(policies.policy_for(Scope::Auth), policies.auth);
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let policy = Policy::new(0, 60_000);
        assert!(policy.validate(Scope::Chat).is_err());
    }

    #[test]
    fn test_zero_window_is_invalid() {
        let policy = Policy::new(10, 0);
        assert!(policy.validate(Scope::Booking).is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_remaining_defaults() {
        let yaml = r#"
auth:
  limit: 3
  window_ms: 1000
"#;
        let policies: PolicySet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policies.auth, Policy::new(3, 1_000));
        assert_eq!(policies.chat, Policy::new(60, 60_000));
        assert_eq!(policies.booking, Policy::new(10, 60_000));
    }
}
