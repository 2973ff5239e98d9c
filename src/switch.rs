//! Confirm/cancel flow for changing the conversation language.
//!
//! Switching wipes the conversation, so a toggle press only arms the switch;
//! the effects run on `confirm`.

use crate::guard::{GuardEffect, GuardEvent, GuardMachine};
use crate::i18n::Language;
use crate::metrics::GuardMetrics;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwitchError {
    #[error("No language switch is pending")]
    NotPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchRequest {
    /// The requested language is already active
    Unchanged,
    /// Awaiting confirmation to switch to this language
    Pending(Language),
    /// Ignored: a switch to this language already awaits confirmation
    Locked(Language),
}

/// A confirmed switch: the effects to run, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchPlan {
    pub target: Language,
    pub effects: Vec<GuardEffect>,
}

pub struct LanguageSwitchCoordinator {
    metrics: Arc<GuardMetrics>,
}

impl LanguageSwitchCoordinator {
    pub fn new(metrics: Arc<GuardMetrics>) -> Self {
        Self { metrics }
    }

    /// Arm a switch to `target`. Unsent drafts and pending responses do not
    /// prevent it.
    pub fn request_switch(
        &self,
        machine: &mut GuardMachine,
        current: Language,
        target: Language,
    ) -> SwitchRequest {
        if target == current {
            return SwitchRequest::Unchanged;
        }

        machine.apply(GuardEvent::ToggleLanguage { target }, current);
        self.metrics.record_switch_requested();
        info!(from = current.code(), to = target.code(), "Language switch requested");
        SwitchRequest::Pending(target)
    }

    /// Confirm the pending switch.
    ///
    /// The plan clears history and identifiers, clears the draft and applies
    /// the new language, in that order. Unsent draft text is discarded.
    pub fn confirm(
        &self,
        machine: &mut GuardMachine,
        current: Language,
    ) -> Result<SwitchPlan, SwitchError> {
        let target = machine
            .state()
            .pending_switch()
            .ok_or(SwitchError::NotPending)?;

        let effects = machine.apply(GuardEvent::ConfirmSwitch, current);
        self.metrics.record_switch_confirmed();
        info!(from = current.code(), to = target.code(), "Language switch confirmed");

        Ok(SwitchPlan { target, effects })
    }

    /// Discard the pending switch. Returns the discarded target, or `None`
    /// when nothing was pending.
    pub fn cancel(&self, machine: &mut GuardMachine, current: Language) -> Option<Language> {
        let target = machine.state().pending_switch()?;

        machine.apply(GuardEvent::CancelSwitch, current);
        self.metrics.record_switch_cancelled();
        info!(target = target.code(), "Language switch cancelled");
        Some(target)
    }
}
