//! Process-wide counters for claim checks.
//!
//! [`FactChecker`](crate::FactChecker) bumps these as documents are verified,
//! skipped or fail. The CLI logs a [`MetricsSnapshot`] once per run.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

pub static METRICS: Metrics = Metrics::new();

#[derive(Debug, Default)]
pub struct Metrics {
    claims_checked: AtomicU64,
    documents_verified: AtomicU64,
    documents_skipped: AtomicU64,
    documents_failed: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub claims_checked: u64,
    pub documents_verified: u64,
    pub documents_skipped: u64,
    pub documents_failed: u64,
}

impl MetricsSnapshot {
    /// Documents that reached a verdict or were dropped, excluding failures.
    pub fn documents_handled(&self) -> u64 {
        self.documents_verified + self.documents_skipped
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            claims_checked: AtomicU64::new(0),
            documents_verified: AtomicU64::new(0),
            documents_skipped: AtomicU64::new(0),
            documents_failed: AtomicU64::new(0),
        }
    }

    fn bump(counter: &AtomicU64, name: &'static str) {
        let value = counter.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(metric = name, value, "counter incremented");
    }

    pub fn inc_claims(&self) {
        Self::bump(&self.claims_checked, "claims_checked");
    }

    pub fn inc_verified(&self) {
        Self::bump(&self.documents_verified, "documents_verified");
    }

    pub fn inc_skipped(&self) {
        Self::bump(&self.documents_skipped, "documents_skipped");
    }

    pub fn inc_failed(&self) {
        Self::bump(&self.documents_failed, "documents_failed");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            claims_checked: self.claims_checked.load(Ordering::Relaxed),
            documents_verified: self.documents_verified.load(Ordering::Relaxed),
            documents_skipped: self.documents_skipped.load(Ordering::Relaxed),
            documents_failed: self.documents_failed.load(Ordering::Relaxed),
        }
    }

    /// Log the current counters as one `info!` event and return them.
    pub fn flush(&self) -> MetricsSnapshot {
        let snap = self.snapshot();
        tracing::info!(
            metric = "flush",
            claims_checked = snap.claims_checked,
            documents_verified = snap.documents_verified,
            documents_skipped = snap.documents_skipped,
            documents_failed = snap.documents_failed,
        );
        snap
    }

    pub fn reset(&self) {
        for counter in [
            &self.claims_checked,
            &self.documents_verified,
            &self.documents_skipped,
            &self.documents_failed,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
