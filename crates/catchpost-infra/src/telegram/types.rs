//! Telegram Bot API types.
//!
//! These are Telegram-specific request/response structures. They are NOT
//! the transport-agnostic event types from catchpost-types; conversion
//! happens in [`super::update`] (inbound) and [`super::client`] (outbound).
//! Only the fields Catchpost reads are modelled; everything else in an
//! update is ignored by serde.

use serde::{Deserialize, Serialize};

use catchpost_types::keyboard::{ButtonAction, Keyboard};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// One webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    /// Available sizes of a compressed photo, smallest first.
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// "private", "group", "supergroup" or "channel".
    #[serde(rename = "type")]
    pub kind: String,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.kind == "private"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// The message the pressed button belongs to. Absent for very old
    /// messages.
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendPhoto<'a> {
    pub chat_id: i64,
    pub photo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
}

/// Image files uploaded uncompressed carry a document file id, which only
/// `sendDocument` accepts.
#[derive(Debug, Clone, Serialize)]
pub struct SendDocument<'a> {
    pub chat_id: i64,
    pub document: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMediaGroup<'a> {
    pub chat_id: i64,
    pub media: Vec<InputMediaPhoto<'a>>,
}

/// Album item. Only the first item of an album carries the caption.
#[derive(Debug, Clone, Serialize)]
pub struct InputMediaPhoto<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub media: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
}

impl<'a> InputMediaPhoto<'a> {
    pub fn new(media: &'a str, caption: Option<&'a str>) -> Self {
        Self {
            kind: "photo",
            media,
            caption,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EditMessageText<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

/// Replaces the keyboard. An absent markup removes it.
#[derive(Debug, Clone, Serialize)]
pub struct EditMessageReplyMarkup {
    pub chat_id: i64,
    pub message_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub show_alert: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        let inline_keyboard = keyboard
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| match &button.action {
                        ButtonAction::Callback(data) => InlineKeyboardButton {
                            text: button.label.clone(),
                            callback_data: Some(data.to_string()),
                            url: None,
                        },
                        ButtonAction::Url(url) => InlineKeyboardButton {
                            text: button.label.clone(),
                            callback_data: None,
                            url: Some(url.clone()),
                        },
                    })
                    .collect()
            })
            .collect();
        Self { inline_keyboard }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Envelope of every Bot API response.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error_code: Option<u16>,
    #[serde(default)]
    pub description: Option<String>,
}

/// The parts of a sent message the client needs back.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
    pub chat: SentChat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentChat {
    pub id: i64,
}
