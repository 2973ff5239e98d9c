//! Debounced classification of the draft.
//!
//! Each `schedule` call supersedes the previous one: the old task's
//! `CancellationToken` is cancelled and a new task is armed with a fresh token
//! and the next generation number. Detections are delivered on a channel and
//! tagged with their generation so the receiver can drop anything that was
//! already in flight when it got superseded.

use crate::classifier::{DetectionResult, LanguageClassifier};
use crate::metrics::GuardMetrics;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default pause in typing before a draft is classified.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A classification published by the debounce task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub generation: u64,
    pub text: String,
    pub result: DetectionResult,
}

/// What `schedule` did with the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    /// A classification is armed under this generation
    Armed(u64),
    /// The draft was blank: pending work was dropped and nothing was armed
    Cleared,
}

pub struct DebounceScheduler {
    delay: Duration,
    classifier: Arc<LanguageClassifier>,
    metrics: Arc<GuardMetrics>,
    tx: mpsc::UnboundedSender<Detection>,
    pending: Option<CancellationToken>,
    generation: u64,
}

impl DebounceScheduler {
    /// Create a scheduler and the receiving end of its detection channel.
    pub fn new(
        delay: Duration,
        classifier: Arc<LanguageClassifier>,
        metrics: Arc<GuardMetrics>,
    ) -> (Self, mpsc::UnboundedReceiver<Detection>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            delay,
            classifier,
            metrics,
            tx,
            pending: None,
            generation: 0,
        };
        (scheduler, rx)
    }

    /// Arm a classification of `text`, superseding any pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, text: &str) -> Scheduled {
        self.cancel();

        if text.trim().is_empty() {
            return Scheduled::Cleared;
        }

        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let delay = self.delay;
        let text = text.to_string();
        let classifier = Arc::clone(&self.classifier);
        let metrics = Arc::clone(&self.metrics);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(generation, "Debounced classification superseded");
                }
                _ = tokio::time::sleep(delay) => {
                    let result = classifier.classify(&text);
                    metrics.record_debounced_classification();
                    debug!(generation, language = ?result.language, "Debounced classification done");
                    // Receiver gone means the session was dropped
                    let _ = tx.send(Detection { generation, text, result });
                }
            }
        });

        Scheduled::Armed(generation)
    }

    /// Drop any pending classification without arming a new one.
    ///
    /// Also invalidates a detection that already fired but has not been
    /// handled yet.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
            self.generation += 1;
        }
    }

    /// Whether a detection with this generation is still the latest armed one.
    pub fn is_current(&self, generation: u64) -> bool {
        self.pending.is_some() && generation == self.generation
    }

    /// Mark the current detection as consumed.
    pub fn complete(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.pending = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    fn scheduler() -> (
        DebounceScheduler,
        mpsc::UnboundedReceiver<Detection>,
        Arc<GuardMetrics>,
    ) {
        let metrics = Arc::new(GuardMetrics::new());
        let (scheduler, rx) = DebounceScheduler::new(
            DEFAULT_DEBOUNCE,
            Arc::new(LanguageClassifier::new()),
            Arc::clone(&metrics),
        );
        (scheduler, rx, metrics)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (mut scheduler, mut rx, metrics) = scheduler();

        let generation = match scheduler.schedule("The system is working correctly") {
            Scheduled::Armed(generation) => generation,
            Scheduled::Cleared => panic!("non-blank draft should arm"),
        };

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());

        let detection = rx.recv().await.expect("detection should be published");
        assert_eq!(detection.generation, generation);
        assert_eq!(detection.result.language, Some(Language::English));
        assert!(scheduler.is_current(generation));
        assert_eq!(metrics.debounced_classifications(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rescheduling_classifies_only_latest() {
        let (mut scheduler, mut rx, metrics) = scheduler();

        scheduler.schedule("The system is working correctly");
        tokio::time::sleep(Duration::from_millis(200)).await;
        let latest = scheduler.schedule("Bonjour, je voudrais des informations sur mon compte");

        tokio::time::sleep(Duration::from_secs(2)).await;

        let detection = rx.try_recv().expect("latest draft should be classified");
        assert_eq!(Scheduled::Armed(detection.generation), latest);
        assert_eq!(
            detection.text,
            "Bonjour, je voudrais des informations sur mon compte"
        );
        assert_eq!(detection.result.language, Some(Language::French));
        assert!(rx.try_recv().is_err());
        assert_eq!(metrics.debounced_classifications(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_draft_clears_synchronously() {
        let (mut scheduler, mut rx, metrics) = scheduler();

        scheduler.schedule("The system is working correctly");
        assert!(scheduler.is_pending());

        assert_eq!(scheduler.schedule("   \n"), Scheduled::Cleared);
        assert!(!scheduler.is_pending());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(metrics.debounced_classifications(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_invalidates_fired_detection() {
        let (mut scheduler, mut rx, _metrics) = scheduler();

        scheduler.schedule("The system is working correctly");
        let detection = rx.recv().await.expect("detection should be published");

        // Fired but not yet handled when the draft changed
        scheduler.cancel();
        assert!(!scheduler.is_current(detection.generation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_clears_pending() {
        let (mut scheduler, mut rx, _metrics) = scheduler();

        scheduler.schedule("The system is working correctly");
        let detection = rx.recv().await.expect("detection should be published");

        scheduler.complete(detection.generation);
        assert!(!scheduler.is_pending());
        assert!(!scheduler.is_current(detection.generation));
    }
}
