//! Draft language classification.
//!
//! Combines whatlang's trigram identifier with two lexical scorers (function
//! words per language, plus French diacritics). The classifier leans toward
//! "no opinion": short, symbol-only or evenly mixed drafts come back Unknown.

use crate::i18n::Language;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use whatlang::{Detector, Lang};

/// Drafts with fewer trimmed characters than this are never classified.
pub const DEFAULT_MIN_CHARS: usize = 8;

static FRENCH_INDICATORS: OnceLock<Regex> = OnceLock::new();
static ENGLISH_INDICATORS: OnceLock<Regex> = OnceLock::new();

fn french_indicators() -> &'static Regex {
    FRENCH_INDICATORS.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:je|tu|il|elle|nous|vous|ils|elles|le|la|les|un|une|des|du|de|à|avec|pour|dans|sur|par|sans|sous|entre|est|sont|était|étaient|avoir|être|faire|aller|venir|voir|savoir|pouvoir|vouloir|devoir)\b|[àâäéèêëïîôöùûüÿç]",
        )
        .unwrap()
    })
}

fn english_indicators() -> &'static Regex {
    ENGLISH_INDICATORS.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:the|and|or|but|in|on|at|to|for|of|with|by|from|about|into|through|during|before|after|is|are|was|were|be|been|being|have|has|had|do|does|did|will|would|could|should|may|might|can|must|shall|this|that|these|those|what|which|who|when|where|why|how)\b",
        )
        .unwrap()
    })
}

/// Count French function words and diacritics.
pub fn score_french(text: &str) -> usize {
    french_indicators().find_iter(text).count()
}

/// Count English function words.
pub fn score_english(text: &str) -> usize {
    english_indicators().find_iter(text).count()
}

/// Which rule produced a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// Draft below the minimum length
    TooShort,
    /// Statistical English guess (lexical scoring skipped)
    Statistical,
    /// Statistical French corroborated by at least one French indicator
    Corroborated,
    /// Symmetric comparison of the lexical scores
    Lexical,
}

/// The classifier's guess for one draft. `language: None` means Unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub language: Option<Language>,
    pub french_matches: usize,
    pub english_matches: usize,
    pub source: DetectionSource,
}

impl DetectionResult {
    pub fn unknown() -> Self {
        Self {
            language: None,
            french_matches: 0,
            english_matches: 0,
            source: DetectionSource::TooShort,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.language.is_none()
    }

    /// True when the draft was identified as the other language.
    pub fn mismatches(&self, selected: Language) -> bool {
        matches!(self.language, Some(detected) if detected != selected)
    }
}

/// Heuristic English/French classifier.
pub struct LanguageClassifier {
    detector: Detector,
    min_chars: usize,
}

impl LanguageClassifier {
    pub fn new() -> Self {
        Self::with_min_chars(DEFAULT_MIN_CHARS)
    }

    pub fn with_min_chars(min_chars: usize) -> Self {
        Self {
            detector: Detector::new(),
            min_chars,
        }
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Classify a draft. Pure and deterministic.
    pub fn classify(&self, text: &str) -> DetectionResult {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_chars {
            return DetectionResult::unknown();
        }

        let statistical = self.detector.detect(trimmed).map(|info| info.lang());
        resolve(statistical, trimmed)
    }
}

/// Combine the statistical guess with the lexical scores.
///
/// An English guess is trusted as is. A French guess needs at least one
/// French indicator. Anything else is settled by comparing the scores.
fn resolve(statistical: Option<Lang>, text: &str) -> DetectionResult {
    if statistical == Some(Lang::Eng) {
        return DetectionResult {
            language: Some(Language::English),
            french_matches: 0,
            english_matches: 0,
            source: DetectionSource::Statistical,
        };
    }

    let french_matches = score_french(text);
    let english_matches = score_english(text);

    if statistical == Some(Lang::Fra) && french_matches > 0 {
        return DetectionResult {
            language: Some(Language::French),
            french_matches,
            english_matches,
            source: DetectionSource::Corroborated,
        };
    }

    let language = if french_matches > 0 && french_matches > english_matches {
        Some(Language::French)
    } else if english_matches > 0 && english_matches >= french_matches {
        Some(Language::English)
    } else {
        None
    };

    DetectionResult {
        language,
        french_matches,
        english_matches,
        source: DetectionSource::Lexical,
    }
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== Lexical Scorer Tests ====================

    #[test]
    fn test_score_french_words_and_diacritics() {
        // il, était, une, à
        assert_eq!(score_french("Il était une fois à Paris"), 4);
        // only the diacritics: é, è
        assert_eq!(score_french("café crème"), 2);
    }

    #[test]
    fn test_score_french_whole_words_only() {
        // "information" contains "in" and "on" but neither is a French indicator,
        // and "desk" must not count as "des"
        assert_eq!(score_french("information desk"), 0);
    }

    #[test]
    fn test_score_english_words() {
        assert_eq!(score_english("The cat and the dog"), 3);
        assert_eq!(score_english("THE AND OR"), 3);
        assert_eq!(score_english("theatre android"), 0);
    }

    // ==================== Classification Tests ====================

    #[test]
    fn test_short_text_is_unknown() {
        let classifier = LanguageClassifier::new();
        for text in ["", "ok", "   bonjour   ", "the and"] {
            let result = classifier.classify(text);
            assert!(result.is_unknown(), "{:?} should be unknown", text);
            assert_eq!(result.source, DetectionSource::TooShort);
        }
    }

    #[test]
    fn test_french_sentence() {
        let classifier = LanguageClassifier::new();
        let result =
            classifier.classify("Bonjour, je voudrais des informations sur mon compte");
        assert_eq!(result.language, Some(Language::French));
        assert!(result.mismatches(Language::English));
        assert!(!result.mismatches(Language::French));
    }

    #[test]
    fn test_english_sentence() {
        let classifier = LanguageClassifier::new();
        let result = classifier.classify("The system is working correctly");
        assert_eq!(result.language, Some(Language::English));
        assert!(!result.mismatches(Language::English));
    }

    #[test]
    fn test_no_signal_is_unknown() {
        let classifier = LanguageClassifier::new();
        for text in ["😀😀😀😀😀😀😀😀😀", "1234567890 42", "!!!???...,,,;;;"] {
            let result = classifier.classify(text);
            assert!(result.is_unknown(), "{:?} should be unknown", text);
            assert!(!result.mismatches(Language::English));
            assert!(!result.mismatches(Language::French));
        }
    }

    #[test]
    fn test_unknown_never_mismatches() {
        let unknown = DetectionResult::unknown();
        assert!(!unknown.mismatches(Language::English));
        assert!(!unknown.mismatches(Language::French));
    }

    #[test]
    fn test_custom_min_chars() {
        let classifier = LanguageClassifier::with_min_chars(40);
        assert_eq!(classifier.min_chars(), 40);
        assert!(classifier
            .classify("The system is working correctly")
            .is_unknown());
    }

    // ==================== Precedence Tests ====================

    #[test]
    fn test_statistical_english_wins_over_french_indicators() {
        // je, avec outnumber the single "the"
        let result = resolve(Some(Lang::Eng), "Hello je suis ok avec the plan");
        assert_eq!(result.language, Some(Language::English));
        assert_eq!(result.source, DetectionSource::Statistical);
        assert_eq!((result.french_matches, result.english_matches), (0, 0));
    }

    #[test]
    fn test_statistical_french_needs_an_indicator() {
        let result = resolve(
            Some(Lang::Fra),
            "Bonjour, je voudrais des informations sur mon compte",
        );
        assert_eq!(result.language, Some(Language::French));
        assert_eq!(result.source, DetectionSource::Corroborated);
        assert!(result.french_matches > 0);
    }

    #[test]
    fn test_uncorroborated_french_falls_through_to_lexical() {
        let unknown = resolve(Some(Lang::Fra), "Bonjour monsieur merci beaucoup");
        assert_eq!(unknown.language, None);
        assert_eq!(unknown.source, DetectionSource::Lexical);

        let english = resolve(Some(Lang::Fra), "Bonjour monsieur, how is the weather");
        assert_eq!(english.language, Some(Language::English));
        assert_eq!(english.source, DetectionSource::Lexical);
    }

    #[test]
    fn test_other_statistical_guess_uses_lexical_scores() {
        let french = resolve(Some(Lang::Spa), "Hola, je suis avec le groupe");
        assert_eq!(french.language, Some(Language::French));
        assert_eq!(french.source, DetectionSource::Lexical);

        let tie = resolve(None, "je the");
        assert_eq!(tie.language, Some(Language::English));

        let nothing = resolve(None, "zzzz qqqq");
        assert!(nothing.is_unknown());
        assert_eq!(nothing.source, DetectionSource::Lexical);
    }

    #[test]
    fn test_english_guess_with_french_heavy_draft_is_english() {
        let classifier = LanguageClassifier::new();
        // whatlang guesses English for both although French indicators dominate
        for text in ["Hello je suis ok avec the plan", "Le the de and la"] {
            let result = classifier.classify(text);
            assert_eq!(result.language, Some(Language::English), "{:?}", text);
            assert_eq!(result.source, DetectionSource::Statistical);
            assert!(!result.mismatches(Language::English));
        }
    }

    // ==================== Properties ====================

    proptest! {
        #[test]
        fn prop_short_input_is_unknown(text in "\\PC{0,7}") {
            let classifier = LanguageClassifier::new();
            prop_assert!(classifier.classify(&text).is_unknown());
        }

        #[test]
        fn prop_classify_is_deterministic(text in "\\PC{0,120}") {
            let classifier = LanguageClassifier::new();
            prop_assert_eq!(classifier.classify(&text), classifier.classify(&text));
        }

        #[test]
        fn prop_padding_does_not_change_result(text in "[a-zA-Zéàç ,.']{0,60}") {
            let classifier = LanguageClassifier::new();
            let padded = format!("   {}\n\t", text);
            prop_assert_eq!(classifier.classify(&text), classifier.classify(&padded));
        }
    }
}
