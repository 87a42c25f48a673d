//! Identity newtypes for users, chats, messages and media.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Identity of an end user on the messaging platform.
///
/// Drafts are keyed 1:1 by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A chat destination: a private dialogue, the moderator chat, or the
/// public channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for ChatId {
    /// A user's private dialogue shares the user's numeric identity.
    fn from(user: UserId) -> Self {
        Self(user.0)
    }
}

/// Location of a sent message: chat plus message id within that chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: i64,
}

impl MessageRef {
    pub fn new(chat_id: ChatId, message_id: i64) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}

/// Opaque reference to an uploaded media item (platform file id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(pub String);

impl MediaRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parse_and_display() {
        let id: UserId = " 4815162342 ".parse().unwrap();
        assert_eq!(id, UserId(4815162342));
        assert_eq!(id.to_string(), "4815162342");
        assert!("vasya".parse::<UserId>().is_err());
    }

    #[test]
    fn test_private_chat_matches_user() {
        assert_eq!(ChatId::from(UserId(-7)), ChatId(-7));
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&MediaRef::new("AgACAgIAAx")).unwrap();
        assert_eq!(json, "\"AgACAgIAAx\"");
        let json = serde_json::to_string(&UserId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
