//! Chat session: the adapter between the chat form and the guard.
//!
//! Owns the draft, the conversation language, the guard machine, the debounce
//! scheduler and the transport. Every UI entry point goes through here, and
//! guard effects are executed here in the order the machine returns them.

use crate::classifier::{DetectionResult, LanguageClassifier};
use crate::config::GuardConfig;
use crate::debounce::{DebounceScheduler, Detection, Scheduled};
use crate::guard::{GuardEffect, GuardEvent, GuardMachine, GuardState};
use crate::i18n::Language;
use crate::metrics::{GuardMetrics, MetricsReport};
use crate::submission::{SubmissionGate, SubmitRejection};
use crate::switch::{LanguageSwitchCoordinator, SwitchError, SwitchRequest};
use crate::transport::ChatTransport;
use crate::view::ControlsView;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub struct ChatSession<T: ChatTransport> {
    language: Language,
    draft: String,
    detection: DetectionResult,
    machine: GuardMachine,
    scheduler: DebounceScheduler,
    detections: mpsc::UnboundedReceiver<Detection>,
    gate: SubmissionGate,
    switcher: LanguageSwitchCoordinator,
    transport: T,
    metrics: Arc<GuardMetrics>,
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn new(config: &GuardConfig, transport: T) -> Self {
        let classifier = Arc::new(LanguageClassifier::with_min_chars(config.min_detect_chars));
        let metrics = Arc::new(GuardMetrics::new());
        let (scheduler, detections) = DebounceScheduler::new(
            config.debounce,
            Arc::clone(&classifier),
            Arc::clone(&metrics),
        );

        Self {
            language: config.default_language,
            draft: String::new(),
            detection: DetectionResult::unknown(),
            machine: GuardMachine::new(config.min_detect_chars, config.mismatch_warn_chars),
            scheduler,
            detections,
            gate: SubmissionGate::new(classifier, Arc::clone(&metrics)),
            switcher: LanguageSwitchCoordinator::new(Arc::clone(&metrics)),
            transport,
            metrics,
        }
    }

    // ==================== Entry points ====================

    /// Replace the draft with `text`, as typed into the input.
    ///
    /// Returns `false` when the input is frozen and the edit was ignored.
    /// Must be called from within a tokio runtime.
    pub fn input(&mut self, text: &str) -> bool {
        if self.machine.state().is_frozen() {
            debug!("Input ignored while a language switch is pending");
            return false;
        }

        self.draft.clear();
        self.draft.push_str(text);

        let draft_chars = text.trim().chars().count();
        let effects = self
            .machine
            .apply(GuardEvent::DraftEdited { draft_chars }, self.language);
        self.run_effects(effects);

        if self.scheduler.schedule(text) == Scheduled::Cleared
            || draft_chars < self.machine.context(self.language).min_chars
        {
            self.detection = DetectionResult::unknown();
        }

        true
    }

    /// Apply a debounced detection. Superseded detections are dropped.
    ///
    /// Returns whether the detection was applied.
    pub fn handle_detection(&mut self, detection: Detection) -> bool {
        if !self.scheduler.is_current(detection.generation) || self.machine.state().is_frozen() {
            self.metrics.record_stale_detection();
            debug!(generation = detection.generation, "Dropping stale detection");
            return false;
        }
        self.scheduler.complete(detection.generation);

        let previous = self.machine.state();
        self.detection = detection.result;
        let draft_chars = detection.text.trim().chars().count();
        let effects = self.machine.apply(
            GuardEvent::Detected {
                result: detection.result,
                draft_chars,
            },
            self.language,
        );
        self.run_effects(effects);

        if previous.mismatch().is_none() && self.machine.state().mismatch().is_some() {
            self.metrics.record_mismatch_warning();
        }
        true
    }

    /// Wait for the next debounced detection.
    pub async fn next_detection(&mut self) -> Option<Detection> {
        self.detections.recv().await
    }

    /// Wait for the next debounced detection and apply it.
    pub async fn settle(&mut self) -> bool {
        match self.next_detection().await {
            Some(detection) => self.handle_detection(detection),
            None => false,
        }
    }

    /// Press send. On success returns the dispatched question.
    pub fn submit(&mut self) -> Result<String, SubmitRejection> {
        let draft = self.draft.clone();
        match self
            .gate
            .try_submit(&draft, self.language, &mut self.machine, &mut self.transport)
        {
            Ok(accepted) => {
                self.run_effects(accepted.effects);
                self.scheduler.cancel();
                self.detection = DetectionResult::unknown();
                Ok(accepted.question)
            }
            Err(rejection) => {
                if let SubmitRejection::LanguageMismatch { detection, .. } = rejection {
                    // The block stands until the user edits the draft
                    self.scheduler.cancel();
                    self.detection = detection;
                }
                Err(rejection)
            }
        }
    }

    /// Press a language toggle button.
    ///
    /// The toggles are locked while a switch awaits confirmation, so the
    /// press is ignored and the pending target is reported back.
    pub fn press_language(&mut self, target: Language) -> SwitchRequest {
        if let Some(pending) = self.machine.state().pending_switch() {
            debug!(pending = pending.code(), "Toggle ignored while a language switch is pending");
            return SwitchRequest::Locked(pending);
        }

        let request = self
            .switcher
            .request_switch(&mut self.machine, self.language, target);
        if let SwitchRequest::Pending(_) = request {
            self.scheduler.cancel();
        }
        request
    }

    /// Confirm the pending language switch. Returns the new language.
    pub fn confirm_switch(&mut self) -> Result<Language, SwitchError> {
        let plan = self.switcher.confirm(&mut self.machine, self.language)?;
        self.run_effects(plan.effects);
        Ok(plan.target)
    }

    /// Cancel the pending language switch. Returns the discarded target.
    pub fn cancel_switch(&mut self) -> Option<Language> {
        self.switcher.cancel(&mut self.machine, self.language)
    }

    /// Press the clear control.
    ///
    /// Returns `false` when the control is locked by a pending switch.
    pub fn clear_chat(&mut self) -> bool {
        if self.machine.state().is_frozen() {
            debug!("Clear ignored while a language switch is pending");
            return false;
        }

        let draft_blank = self.draft.trim().is_empty();
        let effects = self
            .machine
            .apply(GuardEvent::ChatCleared { draft_blank }, self.language);
        info!(history_cleared = draft_blank, "Chat cleared");
        self.run_effects(effects);
        true
    }

    // ==================== Accessors ====================

    pub fn view(&self) -> ControlsView {
        ControlsView::derive(
            self.machine.state(),
            self.language,
            self.transport.is_responding(),
            self.draft.trim().is_empty(),
        )
    }

    pub fn state(&self) -> GuardState {
        self.machine.state()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn detection(&self) -> DetectionResult {
        self.detection
    }

    pub fn is_classification_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn run_effects(&mut self, effects: Vec<GuardEffect>) {
        for effect in effects {
            match effect {
                GuardEffect::ClearHistory => self.transport.clear_history(),
                GuardEffect::ResetIdentifiers => self.transport.reset_identifiers(),
                GuardEffect::ClearDraft => {
                    self.draft.clear();
                    self.detection = DetectionResult::unknown();
                    self.scheduler.cancel();
                }
                GuardEffect::ApplyLanguage(language) => {
                    self.language = language;
                    self.transport.set_conversation_language(language);
                }
            }
        }
    }
}
