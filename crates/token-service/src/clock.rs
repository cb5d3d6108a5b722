//! Wall-clock source for issuance and verification.
//!
//! Token expiries are computed as `now + seconds` from the issuer's local
//! clock. A verifier whose clock is skewed relative to the issuer may reject
//! a fresh token or accept a stale one; that is an operational concern and
//! not checked here.

use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> i64;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
