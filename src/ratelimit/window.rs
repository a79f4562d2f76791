//! Window state and admission decisions.

use serde::Serialize;

/// Mutable per-key state for one fixed window.
///
/// A record is created on the first request for a key and replaced
/// outright once its window has expired; within a live window only the
/// count moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    /// Requests counted against this window, including rejected ones.
    pub count: u32,
    /// Absolute epoch-millisecond timestamp at which the window expires.
    pub reset_at_ms: u64,
}

impl WindowRecord {
    /// Open a fresh window for a first request arriving at `now_ms`.
    pub fn open(now_ms: u64, window_ms: u64) -> Self {
        Self {
            count: 1,
            reset_at_ms: now_ms.saturating_add(window_ms),
        }
    }

    /// Whether the window has expired at `now_ms`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.reset_at_ms <= now_ms
    }
}

/// The outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether the request may proceed.
    pub admitted: bool,
    /// The policy limit the check was made against.
    pub limit: u32,
    /// Requests left in the current window; always 0 when rejected.
    pub remaining: u32,
    /// Absolute epoch-millisecond timestamp at which the window rolls over.
    pub reset_at_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_window_counts_the_first_request() {
        let record = WindowRecord::open(10_000, 60_000);
        assert_eq!(record.count, 1);
        assert_eq!(record.reset_at_ms, 70_000);
    }

    #[test]
    fn test_window_expiry_boundary() {
        let record = WindowRecord::open(10_000, 60_000);
        assert!(!record.is_expired(69_999));
        assert!(record.is_expired(70_000));
        assert!(record.is_expired(70_001));
    }
}
