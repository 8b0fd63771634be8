//! Bounded, append-only conversation log.

use std::collections::VecDeque;

use super::message::ChatMessage;

/// Default number of messages kept in memory.
pub const DEFAULT_MAX_TRANSCRIPT: usize = 50;

/// Ordered log of exchanged messages, capped at `max_len`.
///
/// Pushing past the cap evicts the oldest entry first.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: VecDeque<ChatMessage>,
    max_len: usize,
}

impl Transcript {
    /// Creates an empty transcript. A zero cap is clamped to one.
    pub fn new(max_len: usize) -> Self {
        let max_len = max_len.max(1);
        Self {
            messages: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    /// Builds a transcript from stored messages, keeping only the most recent `max_len`.
    pub fn from_messages(messages: impl IntoIterator<Item = ChatMessage>, max_len: usize) -> Self {
        let mut transcript = Self::new(max_len);
        for message in messages {
            transcript.push(message);
        }
        transcript
    }

    /// Appends a message, returning the evicted entry if the cap was exceeded.
    pub fn push(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        self.messages.push_back(message);
        if self.messages.len() > self.max_len {
            self.messages.pop_front()
        } else {
            None
        }
    }

    /// Returns the last `n` messages in insertion order.
    pub fn recent(&self, n: usize) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(n);
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::message::Role;

    fn texts(transcript: &Transcript) -> Vec<String> {
        transcript.iter().map(|m| m.text().to_string()).collect()
    }

    #[test]
    fn test_push_within_cap_keeps_everything() {
        let mut transcript = Transcript::new(3);
        assert!(transcript.push(ChatMessage::user("a")).is_none());
        assert!(transcript.push(ChatMessage::assistant("b")).is_none());

        assert_eq!(transcript.len(), 2);
        assert_eq!(texts(&transcript), vec!["a", "b"]);
    }

    #[test]
    fn test_push_evicts_oldest_first() {
        let mut transcript = Transcript::new(3);
        for text in ["1", "2", "3", "4", "5"] {
            transcript.push(ChatMessage::user(text));
            assert!(transcript.len() <= 3);
        }

        assert_eq!(texts(&transcript), vec!["3", "4", "5"]);
    }

    #[test]
    fn test_push_returns_evicted_message() {
        let mut transcript = Transcript::new(1);
        transcript.push(ChatMessage::user("first"));
        let evicted = transcript.push(ChatMessage::assistant("second"));

        assert_eq!(evicted.map(|m| m.text().to_string()), Some("first".to_string()));
        let roles: Vec<_> = transcript.iter().map(ChatMessage::role).collect();
        assert_eq!(roles, vec![Role::Assistant]);
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let transcript = Transcript::from_messages(
            ["a", "b", "c", "d"].into_iter().map(ChatMessage::user),
            10,
        );

        let recent: Vec<_> = transcript.recent(2).iter().map(|m| m.text().to_string()).collect();
        assert_eq!(recent, vec!["c", "d"]);
        assert_eq!(transcript.recent(10).len(), 4);
        assert!(transcript.recent(0).is_empty());
    }

    #[test]
    fn test_from_messages_truncates_to_cap() {
        let transcript = Transcript::from_messages(
            ["a", "b", "c", "d"].into_iter().map(ChatMessage::user),
            2,
        );
        assert_eq!(texts(&transcript), vec!["c", "d"]);
    }

    #[test]
    fn test_zero_cap_is_clamped() {
        let mut transcript = Transcript::new(0);
        transcript.push(ChatMessage::user("x"));
        transcript.push(ChatMessage::user("y"));
        assert_eq!(texts(&transcript), vec!["y"]);
    }

    #[test]
    fn test_clear() {
        let mut transcript = Transcript::new(DEFAULT_MAX_TRANSCRIPT);
        transcript.push(ChatMessage::user("x"));
        transcript.clear();
        assert!(transcript.is_empty());

        transcript.push(ChatMessage::user("y"));
        assert_eq!(texts(&transcript), vec!["y"]);
    }
}
