//! Guard state machine.
//!
//! `GuardState::transition` is a pure `(state, event) -> (state', effects)`
//! function. `GuardMachine` holds the current state and the length thresholds
//! and is what the session drives. Effects are returned in the order they must
//! be executed.

use crate::classifier::{DetectionResult, DEFAULT_MIN_CHARS};
use crate::i18n::Language;
use serde::Serialize;
use tracing::debug;

/// Drafts must be longer than this (trimmed chars) before a mismatch warns.
pub const DEFAULT_WARN_CHARS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    Idle,
    /// Non-blocking banner: the draft looks like `detected`
    MismatchWarning { detected: Language },
    /// A submit was refused because the draft looks like `detected`
    SubmitBlocked { detected: Language },
    /// A language change to `target` awaits confirmation; input is frozen
    SwitchPending { target: Language },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardEvent {
    /// A debounced classification of a draft with `draft_chars` trimmed chars
    Detected {
        result: DetectionResult,
        draft_chars: usize,
    },
    /// The user changed the draft; `draft_chars` is the new trimmed length
    DraftEdited { draft_chars: usize },
    /// The submit-time classification disagreed with the conversation language
    SubmitMismatch { detected: Language },
    /// The question was dispatched
    SubmitAccepted,
    /// A language toggle button was pressed
    ToggleLanguage { target: Language },
    ConfirmSwitch,
    CancelSwitch,
    /// The manual clear control was used
    ChatCleared { draft_blank: bool },
}

/// Side effects the owner of the machine must perform, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardEffect {
    ClearHistory,
    ResetIdentifiers,
    ClearDraft,
    ApplyLanguage(Language),
}

/// Inputs a transition depends on besides the state itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardContext {
    pub language: Language,
    pub min_chars: usize,
    pub warn_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GuardState,
    pub effects: Vec<GuardEffect>,
}

impl Transition {
    fn to(state: GuardState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with_effects(state: GuardState, effects: Vec<GuardEffect>) -> Self {
        Self { state, effects }
    }
}

impl GuardState {
    pub fn transition(self, event: &GuardEvent, ctx: &GuardContext) -> Transition {
        use GuardState::*;

        match (self, *event) {
            // Toggling to the active language never does anything
            (_, GuardEvent::ToggleLanguage { target }) if target == ctx.language => {
                Transition::to(self)
            }
            (_, GuardEvent::ToggleLanguage { target }) => Transition::to(SwitchPending { target }),

            (_, GuardEvent::ChatCleared { draft_blank }) => {
                let mut effects = Vec::with_capacity(3);
                if draft_blank {
                    effects.push(GuardEffect::ClearHistory);
                }
                effects.push(GuardEffect::ResetIdentifiers);
                effects.push(GuardEffect::ClearDraft);
                Transition::with_effects(Idle, effects)
            }

            (SwitchPending { target }, GuardEvent::ConfirmSwitch) => Transition::with_effects(
                Idle,
                vec![
                    GuardEffect::ClearHistory,
                    GuardEffect::ResetIdentifiers,
                    GuardEffect::ClearDraft,
                    GuardEffect::ApplyLanguage(target),
                ],
            ),
            (SwitchPending { .. }, GuardEvent::CancelSwitch) => Transition::to(Idle),
            // Frozen: nothing else reaches a pending switch
            (SwitchPending { .. }, _) => Transition::to(self),

            // Confirm/cancel without a pending switch
            (_, GuardEvent::ConfirmSwitch | GuardEvent::CancelSwitch) => Transition::to(self),

            (_, GuardEvent::DraftEdited { draft_chars }) if draft_chars < ctx.min_chars => {
                Transition::to(Idle)
            }
            (SubmitBlocked { detected }, GuardEvent::DraftEdited { .. }) => {
                Transition::to(MismatchWarning { detected })
            }
            (_, GuardEvent::DraftEdited { .. }) => Transition::to(self),

            // Only an edit lifts a block
            (SubmitBlocked { .. }, GuardEvent::Detected { .. }) => Transition::to(self),
            (_, GuardEvent::Detected { draft_chars, .. }) if draft_chars < ctx.min_chars => {
                Transition::to(Idle)
            }
            (_, GuardEvent::Detected { result, draft_chars }) => match result.language {
                Some(detected) if detected != ctx.language && draft_chars > ctx.warn_chars => {
                    Transition::to(MismatchWarning { detected })
                }
                _ => Transition::to(Idle),
            },

            (_, GuardEvent::SubmitMismatch { detected }) => Transition::to(SubmitBlocked { detected }),
            (_, GuardEvent::SubmitAccepted) => {
                Transition::with_effects(Idle, vec![GuardEffect::ClearDraft])
            }
        }
    }

    /// The target of a pending language switch, present only in `SwitchPending`.
    pub fn pending_switch(&self) -> Option<Language> {
        match self {
            GuardState::SwitchPending { target } => Some(*target),
            _ => None,
        }
    }

    /// Text input and submission are locked while a switch is pending.
    pub fn is_frozen(&self) -> bool {
        matches!(self, GuardState::SwitchPending { .. })
    }

    /// The language shown in the mismatch banner, if it is visible.
    pub fn mismatch(&self) -> Option<Language> {
        match self {
            GuardState::MismatchWarning { detected } | GuardState::SubmitBlocked { detected } => {
                Some(*detected)
            }
            _ => None,
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, GuardState::SubmitBlocked { .. })
    }
}

impl Default for GuardState {
    fn default() -> Self {
        GuardState::Idle
    }
}

/// The current guard state plus the thresholds it is evaluated with.
#[derive(Debug, Clone)]
pub struct GuardMachine {
    state: GuardState,
    min_chars: usize,
    warn_chars: usize,
}

impl GuardMachine {
    pub fn new(min_chars: usize, warn_chars: usize) -> Self {
        Self {
            state: GuardState::Idle,
            min_chars,
            warn_chars,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn context(&self, language: Language) -> GuardContext {
        GuardContext {
            language,
            min_chars: self.min_chars,
            warn_chars: self.warn_chars,
        }
    }

    /// Apply an event under the given conversation language and return the
    /// effects to perform.
    pub fn apply(&mut self, event: GuardEvent, language: Language) -> Vec<GuardEffect> {
        let previous = self.state;
        let transition = previous.transition(&event, &self.context(language));
        self.state = transition.state;

        if previous != self.state {
            debug!(from = ?previous, to = ?self.state, ?event, "Guard transition");
        }

        transition.effects
    }
}

impl Default for GuardMachine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CHARS, DEFAULT_WARN_CHARS)
    }
}
