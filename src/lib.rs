//! Input-language guard for a bilingual (English/French) knowledge-assistant chat.
//!
//! The draft the user types is classified after a typing pause and compared
//! with the conversation language. A state machine decides which banner is
//! shown, whether sending is allowed, and runs the "switch language and clear
//! the conversation" flow. [`session::ChatSession`] ties the pieces together.

pub mod classifier;
pub mod config;
pub mod debounce;
pub mod guard;
pub mod i18n;
pub mod metrics;
pub mod session;
pub mod submission;
pub mod switch;
pub mod transport;
pub mod view;
