use crate::classifier::DEFAULT_MIN_CHARS;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::guard::DEFAULT_WARN_CHARS;
use crate::i18n::Language;
use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Typing pause before a draft is classified
    pub debounce: Duration,

    /// Drafts with fewer trimmed characters are never classified
    pub min_detect_chars: usize,

    /// Drafts must be longer than this before a mismatch shows the banner
    pub mismatch_warn_chars: usize,

    /// Conversation language of a new session
    pub default_language: Language,
}

impl GuardConfig {
    pub fn from_env() -> Result<Self> {
        let default_language = match std::env::var("GUARD_DEFAULT_LANGUAGE") {
            Ok(code) => Language::from_code(&code)
                .context("GUARD_DEFAULT_LANGUAGE must be 'en' or 'fr'")?,
            Err(_) => Language::default(),
        };

        Ok(Self {
            debounce: std::env::var("GUARD_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_DEBOUNCE),
            min_detect_chars: std::env::var("GUARD_MIN_DETECT_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MIN_CHARS),
            mismatch_warn_chars: std::env::var("GUARD_MISMATCH_WARN_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_WARN_CHARS),
            default_language,
        })
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_detect_chars: DEFAULT_MIN_CHARS,
            mismatch_warn_chars: DEFAULT_WARN_CHARS,
            default_language: Language::default(),
        }
    }
}
