//! Submission gate.
//!
//! Wraps the send action. The draft is classified again at the moment of
//! submission; a debounced result may be a keystroke window old.

use crate::classifier::{DetectionResult, LanguageClassifier};
use crate::guard::{GuardEffect, GuardEvent, GuardMachine};
use crate::i18n::Language;
use crate::metrics::GuardMetrics;
use crate::transport::ChatTransport;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    #[error("Draft is empty")]
    EmptyDraft,

    #[error("A response is still pending")]
    ResponsePending,

    #[error("Input is frozen until the language switch is confirmed or cancelled")]
    InputFrozen,

    #[error("Draft looks like {detected} but the conversation language is {selected}")]
    LanguageMismatch {
        detected: Language,
        selected: Language,
        /// The submit-time classification that refused the draft
        detection: DetectionResult,
    },
}

/// A dispatched question and the guard effects still to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub question: String,
    pub detection: DetectionResult,
    pub effects: Vec<GuardEffect>,
}

pub struct SubmissionGate {
    classifier: Arc<LanguageClassifier>,
    metrics: Arc<GuardMetrics>,
}

impl SubmissionGate {
    pub fn new(classifier: Arc<LanguageClassifier>, metrics: Arc<GuardMetrics>) -> Self {
        Self {
            classifier,
            metrics,
        }
    }

    /// Submit `draft` under `language`.
    ///
    /// On acceptance the trimmed question has already been dispatched when
    /// this returns; the caller runs the returned effects (clearing the
    /// draft) afterwards.
    pub fn try_submit<T: ChatTransport + ?Sized>(
        &self,
        draft: &str,
        language: Language,
        machine: &mut GuardMachine,
        transport: &mut T,
    ) -> Result<Accepted, SubmitRejection> {
        if machine.state().is_frozen() {
            return Err(SubmitRejection::InputFrozen);
        }

        let question = draft.trim();
        if question.is_empty() {
            return Err(SubmitRejection::EmptyDraft);
        }
        if transport.is_responding() {
            return Err(SubmitRejection::ResponsePending);
        }

        let detection = self.classifier.classify(question);
        self.metrics.record_submit_classification();

        if let Some(detected) = detection.language.filter(|d| *d != language) {
            machine.apply(GuardEvent::SubmitMismatch { detected }, language);
            self.metrics.record_submission_blocked();
            warn!(
                detected = detected.code(),
                selected = language.code(),
                "Submission blocked: language mismatch"
            );
            return Err(SubmitRejection::LanguageMismatch {
                detected,
                selected: language,
                detection,
            });
        }

        transport.send_question(question);
        let effects = machine.apply(GuardEvent::SubmitAccepted, language);
        self.metrics.record_submission_accepted();
        info!(language = language.code(), "Submission accepted");

        Ok(Accepted {
            question: question.to_string(),
            detection,
            effects,
        })
    }
}
