//! In-memory conversation for one run of the widget

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use crate::events::Role;
use crate::ui::conversation::reply::ReplyTicket;

/// Opaque message identifier, unique within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::with_role(Role::Ai, content)
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Append-only message list. `clear` is the only removal and it advances
/// the epoch so replies requested earlier are refused.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    epoch: u64,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message at the end
    pub fn append(&mut self, message: Message) -> &Message {
        tracing::debug!(id = %message.id, role = ?message.role, "message appended");
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Append the reply for `ticket` unless the store was cleared since it was issued
    pub fn accept_reply(&mut self, ticket: &ReplyTicket, content: String) -> Option<&Message> {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "dropping reply issued before clear"
            );
            return None;
        }
        Some(self.append(Message::ai(content)))
    }

    /// Remove every message
    pub fn clear(&mut self) {
        tracing::info!(count = self.messages.len(), "conversation cleared");
        self.messages.clear();
        self.epoch += 1;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Generation counter, advanced by `clear`
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ticket(epoch: u64) -> ReplyTicket {
        ReplyTicket {
            epoch,
            request_id: MessageId::new(),
        }
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut store = ConversationStore::new();
        store.append(Message::user("first"));
        store.append(Message::ai("second"));
        store.append(Message::user("third"));

        let contents: Vec<&str> = store.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert_eq!(store.messages().last().unwrap().role, Role::User);
    }

    #[test]
    fn ids_are_unique() {
        let mut store = ConversationStore::new();
        for i in 0..50 {
            store.append(Message::user(format!("message {i}")));
        }
        let ids: HashSet<MessageId> = store.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn clear_empties_and_advances_epoch() {
        let mut store = ConversationStore::new();
        store.append(Message::user("hi"));

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.epoch(), 1);
    }

    #[test]
    fn stale_reply_is_refused() {
        let mut store = ConversationStore::new();
        store.append(Message::user("hi"));
        let stale = ticket(store.epoch());
        store.clear();

        assert!(store.accept_reply(&stale, "late".to_string()).is_none());
        assert!(store.is_empty());

        let fresh = ticket(store.epoch());
        let reply = store.accept_reply(&fresh, "on time".to_string()).unwrap();
        assert_eq!(reply.role, Role::Ai);
        assert_eq!(store.messages().len(), 1);
    }
}
