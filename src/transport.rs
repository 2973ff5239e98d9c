//! Boundary to the chat transport layer.
//!
//! The guard only needs to dispatch a question, know whether a response is
//! still pending, clear the conversation and persist the selected language.
//! Delivery, retries and timeouts belong to the implementation.

use crate::i18n::Language;
use tracing::info;

pub trait ChatTransport {
    /// Dispatch a question. Fire-and-forget from the guard's point of view.
    fn send_question(&mut self, question: &str);

    /// Whether a previous question is still awaiting its response.
    fn is_responding(&self) -> bool;

    /// Drop the conversation history. Idempotent.
    fn clear_history(&mut self);

    /// Reset the per-conversation session and user identifiers.
    fn reset_identifiers(&mut self);

    /// Persist the selected conversation language.
    fn set_conversation_language(&mut self, language: Language);
}

/// One call made on a transport, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    SendQuestion(String),
    ClearHistory,
    ResetIdentifiers,
    SetConversationLanguage(Language),
}

/// Transport that keeps the conversation in memory.
///
/// Used by the shell binary and by tests; `calls()` exposes every call in
/// order so effect ordering can be asserted.
#[derive(Debug)]
pub struct InMemoryTransport {
    history: Vec<String>,
    session_id: u64,
    user_id: u64,
    language: Language,
    responding: bool,
    calls: Vec<TransportCall>,
}

impl InMemoryTransport {
    pub fn new(language: Language) -> Self {
        Self {
            history: Vec::new(),
            session_id: 1,
            user_id: 1,
            language,
            responding: false,
            calls: Vec::new(),
        }
    }

    /// Simulate the response to the last question arriving (or not yet).
    pub fn set_responding(&mut self, responding: bool) {
        self.responding = responding;
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn calls(&self) -> &[TransportCall] {
        &self.calls
    }

    /// Number of recorded calls matching `call`.
    pub fn count(&self, call: &TransportCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl ChatTransport for InMemoryTransport {
    fn send_question(&mut self, question: &str) {
        info!(language = self.language.code(), "Question dispatched: {}", question);
        self.history.push(question.to_string());
        self.calls
            .push(TransportCall::SendQuestion(question.to_string()));
    }

    fn is_responding(&self) -> bool {
        self.responding
    }

    fn clear_history(&mut self) {
        self.history.clear();
        self.calls.push(TransportCall::ClearHistory);
    }

    fn reset_identifiers(&mut self) {
        self.session_id += 1;
        self.user_id += 1;
        self.calls.push(TransportCall::ResetIdentifiers);
    }

    fn set_conversation_language(&mut self, language: Language) {
        self.language = language;
        self.calls
            .push(TransportCall::SetConversationLanguage(language));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_appends_history() {
        let mut transport = InMemoryTransport::new(Language::English);
        transport.send_question("What is my balance?");
        transport.send_question("And my last payment?");

        assert_eq!(transport.history().len(), 2);
        assert_eq!(
            transport.calls()[0],
            TransportCall::SendQuestion("What is my balance?".to_string())
        );
    }

    #[test]
    fn test_clear_history_is_idempotent() {
        let mut transport = InMemoryTransport::new(Language::English);
        transport.send_question("What is my balance?");
        transport.clear_history();
        transport.clear_history();

        assert!(transport.history().is_empty());
        assert_eq!(transport.count(&TransportCall::ClearHistory), 2);
    }

    #[test]
    fn test_reset_identifiers_rotates_ids() {
        let mut transport = InMemoryTransport::new(Language::English);
        let (session, user) = (transport.session_id(), transport.user_id());
        transport.reset_identifiers();

        assert_ne!(transport.session_id(), session);
        assert_ne!(transport.user_id(), user);
    }

    #[test]
    fn test_language_is_persisted() {
        let mut transport = InMemoryTransport::new(Language::English);
        transport.set_conversation_language(Language::French);
        assert_eq!(transport.language(), Language::French);
    }

    #[test]
    fn test_responding_flag() {
        let mut transport = InMemoryTransport::default();
        assert!(!transport.is_responding());
        transport.set_responding(true);
        assert!(transport.is_responding());
    }
}
