//! Core rate limiter implementation.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::clock::{Clock, SystemClock};
use super::policy::Policy;
use super::window::{Decision, WindowRecord};

/// Number of tracked keys above which a check first sweeps out expired
/// records. Bounds store growth under churn of many distinct subjects
/// (e.g. many client addresses) without a background task.
const CLEANUP_THRESHOLD: usize = 1000;

/// Fixed-window rate limiter for a single policy.
///
/// Each policy owns its own limiter and store; instances never share
/// state. The store sits behind one mutex so the increment-and-compare
/// in [`check`](Self::check) stays atomic under parallel request
/// handling.
pub struct FixedWindowLimiter<C: Clock = SystemClock> {
    /// The policy this limiter enforces
    policy: Policy,
    /// Time source for window bookkeeping
    clock: C,
    /// Window records indexed by request key
    windows: Mutex<HashMap<String, WindowRecord>>,
}

impl FixedWindowLimiter {
    /// Create a limiter on the system clock.
    pub fn new(policy: Policy) -> Self {
        Self::with_clock(policy, SystemClock)
    }
}

impl<C: Clock> FixedWindowLimiter<C> {
    /// Create a limiter with an explicit time source.
    pub fn with_clock(policy: Policy, clock: C) -> Self {
        Self {
            policy,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// The policy this limiter enforces.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Decide whether the request identified by `key` may proceed.
    ///
    /// Never fails: every call lands on an admit or reject decision. A
    /// rejected request still consumes a slot in the current window, so
    /// the counter keeps rising under sustained overload while
    /// `remaining` stays 0 until the window rolls over.
    pub fn check(&self, key: &str) -> Decision {
        let now = self.clock.now_ms();
        let mut windows = self.windows.lock();

        if windows.len() > CLEANUP_THRESHOLD {
            let before = windows.len();
            windows.retain(|_, record| !record.is_expired(now));
            debug!(
                before,
                after = windows.len(),
                "Swept expired rate limit windows"
            );
        }

        match windows.get_mut(key) {
            Some(record) if !record.is_expired(now) => {
                record.count = record.count.saturating_add(1);
                let reset_at_ms = record.reset_at_ms;
                if record.count > self.policy.limit {
                    debug!(key, count = record.count, "Rate limit exceeded");
                    Decision {
                        admitted: false,
                        limit: self.policy.limit,
                        remaining: 0,
                        reset_at_ms,
                    }
                } else {
                    trace!(key, count = record.count, "Request admitted");
                    Decision {
                        admitted: true,
                        limit: self.policy.limit,
                        remaining: self.policy.limit - record.count,
                        reset_at_ms,
                    }
                }
            }
            _ => {
                let record = WindowRecord::open(now, self.policy.window_ms);
                let reset_at_ms = record.reset_at_ms;
                windows.insert(key.to_string(), record);
                trace!(key, "Opened new rate limit window");
                Decision {
                    admitted: true,
                    limit: self.policy.limit,
                    remaining: self.policy.limit.saturating_sub(1),
                    reset_at_ms,
                }
            }
        }
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.lock().len()
    }

    /// Drop all window state.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        self.windows.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::clock::test_clock::ManualClock;
    use super::*;

    fn limiter(limit: u32, window_ms: u64) -> (FixedWindowLimiter<Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let limiter = FixedWindowLimiter::with_clock(Policy::new(limit, window_ms), clock.clone());
        (limiter, clock)
    }

    #[test]
    fn test_first_check_admits_with_full_remaining() {
        let (limiter, _clock) = limiter(10, 60_000);

        let decision = limiter.check("booking:user-1");
        assert!(decision.admitted);
        assert_eq!(decision.limit, 10);
        assert_eq!(decision.remaining, 9);
        assert_eq!(decision.reset_at_ms, 61_000);
    }

    #[test]
    fn test_check_over_limit_rejects() {
        let (limiter, _clock) = limiter(5, 60_000);

        for _ in 0..5 {
            assert!(limiter.check("auth:user-1").admitted);
        }

        // The 6th and every later check in the window reject
        for _ in 0..3 {
            let decision = limiter.check("auth:user-1");
            assert!(!decision.admitted);
            assert_eq!(decision.remaining, 0);
        }
    }

    #[test]
    fn test_auth_scenario_remaining_sequence() {
        let (limiter, clock) = limiter(5, 60_000);

        for expected in [4, 3, 2, 1, 0] {
            let decision = limiter.check("auth:user-1");
            assert!(decision.admitted);
            assert_eq!(decision.remaining, expected);
        }

        let decision = limiter.check("auth:user-1");
        assert!(!decision.admitted);
        assert_eq!(decision.remaining, 0);

        clock.advance(60_001);

        let decision = limiter.check("auth:user-1");
        assert!(decision.admitted);
        assert_eq!(decision.remaining, 4);
    }

    #[test]
    fn test_booking_scenario_anon_key() {
        let (limiter, _clock) = limiter(10, 60_000);

        for _ in 0..10 {
            assert!(limiter.check("booking:anon").admitted);
        }
        assert!(!limiter.check("booking:anon").admitted);
    }

    #[test]
    fn test_window_rollover_readmits_after_rejects() {
        let (limiter, clock) = limiter(2, 1_000);

        assert!(limiter.check("chat:user-1").admitted);
        assert!(limiter.check("chat:user-1").admitted);
        for _ in 0..10 {
            assert!(!limiter.check("chat:user-1").admitted);
        }

        // Rollover resets the count no matter how many rejects piled up
        clock.advance(1_001);
        let decision = limiter.check("chat:user-1");
        assert!(decision.admitted);
        assert_eq!(decision.remaining, 1);
    }

    #[test]
    fn test_rollover_opens_a_fresh_window() {
        let (limiter, clock) = limiter(10, 60_000);

        let first = limiter.check("chat:user-1");
        assert_eq!(first.reset_at_ms, 61_000);

        clock.advance(60_000);
        let second = limiter.check("chat:user-1");
        assert!(second.admitted);
        assert_eq!(second.remaining, 9);
        assert_eq!(second.reset_at_ms, 121_000);
    }

    #[test]
    fn test_distinct_keys_are_isolated() {
        let (limiter, _clock) = limiter(1, 60_000);

        assert!(limiter.check("chat:user-1").admitted);
        assert!(!limiter.check("chat:user-1").admitted);

        // user-2 is untouched by user-1's window
        assert!(limiter.check("chat:user-2").admitted);
    }

    #[test]
    fn test_limiter_instances_are_isolated() {
        let clock = Arc::new(ManualClock::new(1_000));
        let chat = FixedWindowLimiter::with_clock(Policy::new(1, 60_000), clock.clone());
        let auth = FixedWindowLimiter::with_clock(Policy::new(1, 60_000), clock.clone());

        assert!(chat.check("user-1").admitted);
        assert!(!chat.check("user-1").admitted);

        assert!(auth.check("user-1").admitted);
        assert_eq!(chat.tracked_keys(), 1);
        assert_eq!(auth.tracked_keys(), 1);
    }

    #[test]
    fn test_cleanup_sweeps_expired_keys() {
        let (limiter, clock) = limiter(10, 1_000);

        for i in 0..1_001 {
            limiter.check(&format!("chat:10.0.0.{}", i));
        }
        assert_eq!(limiter.tracked_keys(), 1_001);

        clock.advance(1_001);

        // The next check exceeds the threshold, sweeps every expired
        // record, and leaves only the fresh key behind
        assert!(limiter.check("chat:new-subject").admitted);
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn test_cleanup_keeps_live_windows() {
        let (limiter, clock) = limiter(10, 10_000);

        for i in 0..1_000 {
            limiter.check(&format!("chat:10.0.0.{}", i));
        }
        clock.advance(10_001);
        for i in 0..2 {
            limiter.check(&format!("chat:10.1.0.{}", i));
        }
        assert_eq!(limiter.tracked_keys(), 1_002);

        // Sweep drops the 1000 expired records but not the 2 live ones
        assert!(limiter.check("chat:10.2.0.1").admitted);
        assert_eq!(limiter.tracked_keys(), 3);
    }

    #[test]
    fn test_clear() {
        let (limiter, _clock) = limiter(10, 60_000);

        limiter.check("chat:user-1");
        assert_eq!(limiter.tracked_keys(), 1);

        limiter.clear();
        assert_eq!(limiter.tracked_keys(), 0);
    }
}
