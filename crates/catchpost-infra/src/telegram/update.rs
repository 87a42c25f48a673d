//! Decoding of Telegram updates into transport-agnostic events.
//!
//! Wizard events come only from private chats. Moderation events are
//! button presses whose data carries a `mod:` verdict; the chat they were
//! pressed in is taken from the message the button is attached to, and the
//! coordinator decides whether that chat is allowed to moderate.

use std::str::FromStr;

use catchpost_types::event::{EventKind, Inbound, InboundEvent, ModerationEvent};
use catchpost_types::ids::{ChatId, MediaRef, MessageRef, UserId};
use catchpost_types::keyboard::CallbackData;

use super::types::{CallbackQuery, Message, PhotoSize, Update};

/// Result of decoding one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Event(Inbound),
    /// Nothing to do. A button press still has to be acknowledged so the
    /// client stops its progress indicator.
    Ignored {
        callback_id: Option<String>,
        reason: &'static str,
    },
}

impl Decoded {
    fn ignored(reason: &'static str) -> Self {
        Decoded::Ignored {
            callback_id: None,
            reason,
        }
    }
}

pub fn decode_update(update: Update) -> Decoded {
    if let Some(query) = update.callback_query {
        return decode_callback(query);
    }
    match update.message {
        Some(message) => decode_message(message),
        None => Decoded::ignored("unsupported update type"),
    }
}

fn decode_message(message: Message) -> Decoded {
    if !message.chat.is_private() {
        return Decoded::ignored("message outside a private chat");
    }
    let Some(from) = message.from.as_ref().filter(|u| !u.is_bot) else {
        return Decoded::ignored("message without a human sender");
    };
    let user_id = UserId(from.id);

    let kind = if let Some(text) = message.text.as_deref() {
        match parse_command(text) {
            Some(("start", payload)) => EventKind::Start {
                payload: payload.map(str::to_string),
            },
            Some(("cancel", _)) => EventKind::Cancel,
            Some(_) => return Decoded::ignored("unknown command"),
            None => EventKind::Text {
                text: text.to_string(),
            },
        }
    } else if let Some(best) = message.photo.as_deref().and_then(largest) {
        EventKind::Media {
            media_ref: MediaRef::new(best.file_id.clone()),
            is_image: true,
        }
    } else if let Some(document) = &message.document {
        // Images sent uncompressed arrive as documents.
        let is_image = document
            .mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"));
        EventKind::Media {
            media_ref: MediaRef::new(document.file_id.clone()),
            is_image,
        }
    } else {
        return Decoded::ignored("unsupported message content");
    };

    Decoded::Event(Inbound::Wizard(InboundEvent::new(user_id, kind)))
}

fn decode_callback(query: CallbackQuery) -> Decoded {
    let ignored = |reason| Decoded::Ignored {
        callback_id: Some(query.id.clone()),
        reason,
    };

    let Some(raw) = query.data.as_deref() else {
        return ignored("button without data");
    };
    let data = match CallbackData::from_str(raw) {
        Ok(data) => data,
        Err(err) => {
            tracing::debug!(data = raw, "Undecodable callback data: {err}");
            return ignored("undecodable button data");
        }
    };

    let origin = query
        .message
        .as_ref()
        .map(|m| MessageRef::new(ChatId(m.chat.id), m.message_id));
    let private = query.message.as_ref().is_none_or(|m| m.chat.is_private());
    let user_id = UserId(query.from.id);

    let kind = match data {
        CallbackData::Moderate { decision, user_id: target } => {
            let Some(origin) = origin else {
                return ignored("moderation button without a message");
            };
            return Decoded::Event(Inbound::Moderation(ModerationEvent {
                decision,
                target,
                chat_id: origin.chat_id,
                origin: Some(origin),
                callback_id: Some(query.id),
            }));
        }
        _ if !private => return ignored("wizard button outside a private chat"),
        CallbackData::Select { step, code } => EventKind::Selection {
            step_hint: step,
            option: code,
        },
        CallbackData::Navigate { direction, target } => EventKind::Navigation {
            direction,
            target: Some(target),
        },
        CallbackData::Cancel => EventKind::Cancel,
    };

    Decoded::Event(Inbound::Wizard(
        InboundEvent::new(user_id, kind).with_callback(query.id, origin),
    ))
}

/// Split `/command[@bot] [payload]` into its command name and payload.
fn parse_command(text: &str) -> Option<(&str, Option<&str>)> {
    let rest = text.trim().strip_prefix('/')?;
    let (head, payload) = match rest.split_once(char::is_whitespace) {
        Some((head, payload)) => (head, Some(payload.trim()).filter(|p| !p.is_empty())),
        None => (rest, None),
    };
    let name = head.split('@').next().unwrap_or(head);
    if name.is_empty() {
        return None;
    }
    Some((name, payload))
}

/// Highest-resolution variant of a photo.
fn largest(sizes: &[PhotoSize]) -> Option<&PhotoSize> {
    sizes
        .iter()
        .max_by_key(|p| (u64::from(p.width) * u64::from(p.height), p.file_size.unwrap_or(0)))
}
