//! Internationalization (i18n) for the bilingual chat.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the two conversation languages and their metadata
//! - `language`: Type-safe `Language` enum (English / French)
//! - `strings`: Localized banner texts, placeholders and control titles
//!
//! # Example
//!
//! ```rust,ignore
//! use chat_language_guard::i18n::Language;
//!
//! let french = Language::from_code("fr")?;
//! assert_eq!(french.french_name(), "Français");
//! ```

mod language;
mod registry;
pub mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::LanguageStrings;
