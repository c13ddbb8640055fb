//! Append-only message feed.
//!
//! The in-memory view of a conversation, ordered by arrival at the
//! synchronizer (not by timestamp). One instance per synchronizer,
//! created per session and dropped with it — no ambient globals.

use super::message::Message;

/// Ordered, append-only sequence of messages.
///
/// Messages are never reordered, edited, or removed. There is no
/// dedup key: if the server echoes a message that was also returned
/// by a concurrent history reload, both copies are kept.
#[derive(Debug, Default)]
pub struct Feed {
    messages: Vec<Message>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the end of the feed.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append a batch in the given order (history load path).
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    /// All messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(author: &str, text: &str) -> Message {
        Message::received_now(author, text)
    }

    #[test]
    fn appends_preserve_arrival_order() {
        let mut feed = Feed::new();
        feed.append(msg("a", "first"));
        feed.append(msg("b", "second"));
        feed.append(msg("a", "third"));

        let texts: Vec<_> = feed.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn batch_extend_keeps_response_order() {
        let mut feed = Feed::new();
        feed.extend([msg("a", "1"), msg("b", "2")]);
        feed.append(msg("c", "3"));

        assert_eq!(feed.len(), 3);
        assert_eq!(feed.last().map(|m| m.text.as_str()), Some("3"));
    }

    #[test]
    fn duplicate_messages_are_kept() {
        let mut feed = Feed::new();
        let m = msg("a", "echo");
        feed.append(m.clone());
        feed.append(m);
        assert_eq!(feed.len(), 2);
    }
}
