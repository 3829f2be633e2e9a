//! Channels, messages, and friend statuses.

use roster_protocol::{UserStatus, Value};

/// One chat message. Immutable once created; the content is never
/// interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: String,
    pub content: Value,
}

impl Message {
    pub fn new(sender: impl Into<String>, content: Value) -> Self {
        Self {
            sender: sender.into(),
            content,
        }
    }
}

/// A named message stream.
///
/// Public channels are keyed by channel name, private channels by the
/// other party's user id. Whether a channel is private is fixed when it
/// is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    name: String,
    is_private: bool,
    /// Arrival order. Never re-sorted or edited in place.
    messages: Vec<Message>,
}

impl Channel {
    pub fn new(name: impl Into<String>, is_private: bool) -> Self {
        Self {
            name: name.into(),
            is_private,
            messages: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Appends one message.
    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Pairs `senders[i]` with `contents[i]` and appends the pairs in
    /// order. Stops at the shorter of the two lists; extra entries in the
    /// longer list are ignored.
    ///
    /// Returns exactly the messages that were appended.
    pub(crate) fn append_zipped(
        &mut self,
        senders: Vec<String>,
        contents: Vec<Value>,
    ) -> &[Message] {
        let start = self.messages.len();
        self.messages.extend(
            senders
                .into_iter()
                .zip(contents)
                .map(|(sender, content)| Message { sender, content }),
        );
        &self.messages[start..]
    }

    pub(crate) fn clear_messages(&mut self) {
        self.messages.clear();
    }
}

/// A friend's status as delivered by a status-update event. Not cached.
#[derive(Debug, Clone, PartialEq)]
pub struct FriendStatus {
    pub user_id: String,
    pub status: UserStatus,
    /// Whether the event carried a status message at all. A present but
    /// null message still counts.
    pub has_message: bool,
    pub message: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_append_zipped_truncates_to_shorter_list() {
        let mut channel = Channel::new("general", false);

        let added = channel
            .append_zipped(names(&["x", "y", "z"]), texts(&["m1", "m2"]))
            .to_vec();

        assert_eq!(
            added,
            vec![
                Message::new("x", Value::from("m1")),
                Message::new("y", Value::from("m2")),
            ]
        );
        assert_eq!(channel.messages().len(), 2);
    }

    #[test]
    fn test_append_zipped_returns_only_new_messages() {
        let mut channel = Channel::new("general", false);
        channel.push(Message::new("a", Value::from("old")));

        let added = channel.append_zipped(names(&["b"]), texts(&["new"]));

        assert_eq!(added, &[Message::new("b", Value::from("new"))]);
        assert_eq!(channel.messages().len(), 2);
    }

    #[test]
    fn test_clear_then_reapply_yields_same_sequence() {
        let mut channel = Channel::new("general", false);
        channel.append_zipped(names(&["x", "y"]), texts(&["m1", "m2"]));
        let original = channel.messages().to_vec();

        channel.clear_messages();
        channel.append_zipped(names(&["x", "y"]), texts(&["m1", "m2"]));

        assert_eq!(channel.messages(), original.as_slice());
    }
}
