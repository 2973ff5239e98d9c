//! Render state of the chat form controls.
//!
//! Everything here is derived from the guard state, the conversation
//! language, whether a response is pending and whether the draft is blank.
//! Front-ends render a `ControlsView`; they do not toggle controls on their own.

use crate::guard::GuardState;
use crate::i18n::strings::{self, LanguageStrings};
use crate::i18n::Language;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MismatchBanner {
    pub detected: Language,
    pub selected: Language,
    /// Set after a refused submission
    pub blocking: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchBanner {
    pub current: Language,
    pub target: Language,
    pub message_en: String,
    pub message_fr: String,
    pub cancel_label: &'static str,
    pub confirm_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleButton {
    pub language: Language,
    pub label: &'static str,
    pub active: bool,
    pub enabled: bool,
    /// Empty while the controls are locked
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextInput {
    pub enabled: bool,
    /// Highlighted as an error after a refused submission
    pub error: bool,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendControl {
    pub enabled: bool,
    pub busy: bool,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearControl {
    pub enabled: bool,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlsView {
    pub mismatch_banner: Option<MismatchBanner>,
    pub switch_banner: Option<SwitchBanner>,
    pub toggles: [ToggleButton; 2],
    pub input: TextInput,
    pub send: SendControl,
    pub clear: ClearControl,
}

impl ControlsView {
    pub fn derive(
        state: GuardState,
        language: Language,
        responding: bool,
        draft_blank: bool,
    ) -> Self {
        let frozen = state.is_frozen();

        let mismatch_banner = state.mismatch().map(|detected| MismatchBanner {
            detected,
            selected: language,
            blocking: state.is_blocking(),
            message: strings::mismatch_message(detected, language),
        });

        let switch_banner = state.pending_switch().map(|target| {
            let (message_en, message_fr) = strings::switch_confirmation(target);
            SwitchBanner {
                current: language,
                target,
                message_en,
                message_fr,
                cancel_label: strings::SWITCH_CANCEL_LABEL,
                confirm_label: strings::SWITCH_CONFIRM_LABEL,
            }
        });

        let toggles = Language::ALL.map(|button| {
            let button_strings = LanguageStrings::for_language(button);
            ToggleButton {
                language: button,
                label: button_strings.toggle_label,
                active: button == language,
                enabled: !frozen,
                title: if frozen { "" } else { button_strings.toggle_title },
            }
        });

        let placeholder = if frozen {
            ""
        } else if responding {
            strings::RESPONDING_PLACEHOLDER
        } else {
            LanguageStrings::for_language(language).input_placeholder
        };

        let send_title = if frozen {
            String::new()
        } else if draft_blank {
            strings::EMPTY_DRAFT_TITLE.to_string()
        } else {
            strings::send_title(language)
        };

        Self {
            mismatch_banner,
            switch_banner,
            toggles,
            input: TextInput {
                enabled: !responding && !frozen,
                error: state.is_blocking(),
                placeholder,
            },
            send: SendControl {
                enabled: !responding && !frozen && !draft_blank,
                busy: responding,
                title: send_title,
            },
            clear: ClearControl {
                enabled: !frozen,
                title: if frozen { "" } else { strings::CLEAR_TITLE },
            },
        }
    }
}
