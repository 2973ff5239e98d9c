use crate::i18n::Language;

/// Localized strings tied to one conversation language.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    /// Input placeholder while this language is selected and nothing blocks typing
    pub input_placeholder: &'static str,

    /// Tooltip of the toggle button that selects this language
    pub toggle_title: &'static str,

    /// Label of the toggle button that selects this language
    pub toggle_label: &'static str,
}

impl LanguageStrings {
    pub fn for_language(language: Language) -> &'static LanguageStrings {
        match language {
            Language::English => &ENGLISH_STRINGS,
            Language::French => &FRENCH_STRINGS,
        }
    }
}

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    input_placeholder: "Type a new question...",
    toggle_title: "Switch to English",
    toggle_label: "EN",
};

pub const FRENCH_STRINGS: LanguageStrings = LanguageStrings {
    input_placeholder: "Tapez votre question en français...",
    toggle_title: "Passer au français",
    toggle_label: "FR",
};

// ==================== Language-independent chrome ====================

/// Placeholder while a response is still pending
pub const RESPONDING_PLACEHOLDER: &str = "Please wait for the response...";

/// Send control tooltip while the draft is blank
pub const EMPTY_DRAFT_TITLE: &str = "Type a message first";

/// Clear control tooltip
pub const CLEAR_TITLE: &str = "Clear Chat";

/// Switch banner buttons
pub const SWITCH_CANCEL_LABEL: &str = "No / Non";
pub const SWITCH_CONFIRM_LABEL: &str = "Yes / Oui";

/// Send control tooltip while a draft is ready.
pub fn send_title(selected: Language) -> String {
    format!("Send message in {}", selected.name())
}

/// Body of the mismatch banner.
pub fn mismatch_message(detected: Language, selected: Language) -> String {
    format!(
        "You're typing in {detected} but have selected {selected}. \
         Switch to {detected} or retype in {selected}.",
        detected = detected.name(),
        selected = selected.name(),
    )
}

/// The two lines of the switch confirmation banner: English first, French second.
pub fn switch_confirmation(target: Language) -> (String, String) {
    (
        format!(
            "Switch to {}? All chats will be cleared.",
            target.name()
        ),
        format!(
            "Basculer vers {}? Tous les chats seront effacés.",
            target.french_name()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings_lookup() {
        assert_eq!(
            LanguageStrings::for_language(Language::English).toggle_label,
            "EN"
        );
        assert_eq!(
            LanguageStrings::for_language(Language::French).toggle_label,
            "FR"
        );
    }

    #[test]
    fn test_placeholders_are_localized() {
        assert!(ENGLISH_STRINGS.input_placeholder.contains("question"));
        assert!(FRENCH_STRINGS.input_placeholder.contains("français"));
    }

    #[test]
    fn test_send_title() {
        assert_eq!(send_title(Language::French), "Send message in French");
    }

    #[test]
    fn test_mismatch_message_names_both_languages() {
        let message = mismatch_message(Language::French, Language::English);
        assert!(message.starts_with("You're typing in French but have selected English."));
        assert!(message.ends_with("retype in English."));
    }

    #[test]
    fn test_switch_confirmation_is_bilingual() {
        let (en, fr) = switch_confirmation(Language::French);
        assert_eq!(en, "Switch to French? All chats will be cleared.");
        assert_eq!(fr, "Basculer vers Français? Tous les chats seront effacés.");

        let (en, fr) = switch_confirmation(Language::English);
        assert_eq!(en, "Switch to English? All chats will be cleared.");
        assert_eq!(fr, "Basculer vers Anglais? Tous les chats seront effacés.");
    }
}
