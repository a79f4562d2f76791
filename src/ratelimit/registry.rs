//! One limiter per scope, constructed explicitly at startup.

use tracing::info;

use super::key::{derive_key, Scope};
use super::limiter::FixedWindowLimiter;
use super::policy::PolicySet;
use super::window::Decision;

/// The set of limiters the service runs, one per [`Scope`].
///
/// Built once at process start from the configured policies and handed
/// to the HTTP layer; scopes never share a store, so identical subjects
/// in different scopes count independently.
pub struct LimiterRegistry {
    chat: FixedWindowLimiter,
    booking: FixedWindowLimiter,
    auth: FixedWindowLimiter,
}

impl LimiterRegistry {
    /// Construct a limiter per scope from the policy set.
    pub fn new(policies: &PolicySet) -> Self {
        for scope in Scope::ALL {
            let policy = policies.policy_for(scope);
            info!(
                scope = %scope,
                limit = policy.limit,
                window_ms = policy.window_ms,
                "Configured rate limit policy"
            );
        }

        Self {
            chat: FixedWindowLimiter::new(policies.chat),
            booking: FixedWindowLimiter::new(policies.booking),
            auth: FixedWindowLimiter::new(policies.auth),
        }
    }

    /// The limiter backing a scope.
    pub fn limiter(&self, scope: Scope) -> &FixedWindowLimiter {
        match scope {
            Scope::Chat => &self.chat,
            Scope::Booking => &self.booking,
            Scope::Auth => &self.auth,
        }
    }

    /// Derive the key for a request and run the scope's check.
    pub fn check(
        &self,
        scope: Scope,
        principal: Option<&str>,
        remote_addr: Option<&str>,
    ) -> Decision {
        let key = derive_key(scope, principal, remote_addr);
        self.limiter(scope).check(&key)
    }
}
