//! Guard metrics and observability.
//!
//! Counters for classifier runs, warnings and gate decisions. A session owns
//! one `GuardMetrics` behind an `Arc` so the debounce task can count the
//! classifications it performs.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-session guard counters.
#[derive(Debug, Default)]
pub struct GuardMetrics {
    /// Classifications performed by the debounce task
    debounced_classifications: AtomicUsize,

    /// Classifications performed synchronously at submit time
    submit_classifications: AtomicUsize,

    /// Detections that arrived after being superseded and were dropped
    stale_detections: AtomicUsize,

    /// Transitions into the non-blocking mismatch warning
    mismatch_warnings: AtomicUsize,

    submissions_accepted: AtomicUsize,
    submissions_blocked: AtomicUsize,

    switches_requested: AtomicUsize,
    switches_confirmed: AtomicUsize,
    switches_cancelled: AtomicUsize,
}

impl GuardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_debounced_classification(&self) {
        self.debounced_classifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_submit_classification(&self) {
        self.submit_classifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_detection(&self) {
        self.stale_detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mismatch_warning(&self) {
        self.mismatch_warnings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_submission_accepted(&self) {
        self.submissions_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_submission_blocked(&self) {
        self.submissions_blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_switch_requested(&self) {
        self.switches_requested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_switch_confirmed(&self) {
        self.switches_confirmed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_switch_cancelled(&self) {
        self.switches_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn debounced_classifications(&self) -> usize {
        self.debounced_classifications.load(Ordering::Relaxed)
    }

    pub fn submit_classifications(&self) -> usize {
        self.submit_classifications.load(Ordering::Relaxed)
    }

    pub fn stale_detections(&self) -> usize {
        self.stale_detections.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let accepted = self.submissions_accepted.load(Ordering::Relaxed);
        let blocked = self.submissions_blocked.load(Ordering::Relaxed);
        let attempts = accepted + blocked;
        let block_rate = if attempts > 0 {
            (blocked as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            debounced_classifications: self.debounced_classifications(),
            submit_classifications: self.submit_classifications(),
            stale_detections: self.stale_detections(),
            mismatch_warnings: self.mismatch_warnings.load(Ordering::Relaxed),
            submissions_accepted: accepted,
            submissions_blocked: blocked,
            block_rate,
            switches_requested: self.switches_requested.load(Ordering::Relaxed),
            switches_confirmed: self.switches_confirmed.load(Ordering::Relaxed),
            switches_cancelled: self.switches_cancelled.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of the guard counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub debounced_classifications: usize,
    pub submit_classifications: usize,
    pub stale_detections: usize,
    pub mismatch_warnings: usize,
    pub submissions_accepted: usize,
    pub submissions_blocked: usize,

    /// Blocked submissions as a percentage of all gated attempts (0-100)
    pub block_rate: f64,

    pub switches_requested: usize,
    pub switches_confirmed: usize,
    pub switches_cancelled: usize,
}
