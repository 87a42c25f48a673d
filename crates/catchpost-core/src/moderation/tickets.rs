//! Moderation ticket registry.
//!
//! Remembers, per submitting user, the moderator-chat message carrying the
//! approve/reject buttons so it can be edited once the submission is
//! resolved. The map is process-local; after a restart the coordinator
//! falls back to the message the moderator pressed.

use catchpost_types::ids::{MessageRef, UserId};
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct ModerationTickets {
    tickets: DashMap<UserId, MessageRef>,
}

impl ModerationTickets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the control message for `user_id`, replacing any earlier one.
    pub fn record(&self, user_id: UserId, ticket: MessageRef) {
        self.tickets.insert(user_id, ticket);
    }

    pub fn get(&self, user_id: UserId) -> Option<MessageRef> {
        self.tickets.get(&user_id).map(|t| *t.value())
    }

    /// Remove and return the ticket for `user_id`.
    pub fn take(&self, user_id: UserId) -> Option<MessageRef> {
        self.tickets.remove(&user_id).map(|(_, ticket)| ticket)
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catchpost_types::ids::ChatId;

    #[test]
    fn test_record_replaces_and_take_removes() {
        let tickets = ModerationTickets::new();
        tickets.record(UserId(1), MessageRef::new(ChatId(-1), 10));
        tickets.record(UserId(1), MessageRef::new(ChatId(-1), 11));
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets.get(UserId(1)).map(|t| t.message_id), Some(11));

        assert_eq!(tickets.take(UserId(1)).map(|t| t.message_id), Some(11));
        assert!(tickets.take(UserId(1)).is_none());
        assert!(tickets.is_empty());
    }
}
