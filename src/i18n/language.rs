//! Conversation language type.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The single active language context of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "fr")]
    French,
}

impl Language {
    /// Both languages, in toggle order.
    pub const ALL: [Language; 2] = [Language::English, Language::French];

    /// Create a Language from a language code string.
    ///
    /// # Example
    /// ```ignore
    /// let french = Language::from_code("fr")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code).map(|c| c.code) {
            Some("en") => Ok(Language::English),
            Some("fr") => Ok(Language::French),
            _ => bail!("Unknown language code: '{}'", code),
        }
    }

    /// The language a new session starts in.
    pub fn default_language() -> Language {
        match LanguageRegistry::get().default_language().code {
            "fr" => Language::French,
            _ => Language::English,
        }
    }

    /// ISO 639-1 code ("en" / "fr").
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
        }
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the registry lost one of the two built-in languages.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code())
            .expect("Built-in language should always be registered")
    }

    /// English name ("English", "French").
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Name written in French ("Anglais", "Français").
    pub fn french_name(&self) -> &'static str {
        self.config().french_name
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::default_language()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_code(s)
    }
}
