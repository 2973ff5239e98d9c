//! Language registry: Single source of truth for the conversation languages.
//!
//! The chat is bilingual, so the registry holds exactly two entries. It uses a
//! singleton pattern with `OnceLock` so every lookup shares the same table.

use std::sync::OnceLock;

/// Metadata for a conversation language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code ("en", "fr")
    pub code: &'static str,

    /// English name of the language ("English", "French")
    pub name: &'static str,

    /// Name of the language written in French ("Anglais", "Français"),
    /// used by the bilingual confirmation banner
    pub french_name: &'static str,

    /// Whether a new session starts in this language
    pub is_default: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// Codes are matched case-insensitively after trimming, so `" FR "`
    /// resolves to French.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        let code = code.trim();
        self.languages
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(code))
    }

    /// Get the default language configuration.
    ///
    /// # Panics
    /// Panics if the table does not define exactly one default language
    /// (this indicates a configuration error).
    pub fn default_language(&self) -> &LanguageConfig {
        let defaults: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default language found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default languages found in registry"),
        }
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            french_name: "Anglais",
            is_default: true,
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            french_name: "Français",
            is_default: false,
        },
    ]
}
