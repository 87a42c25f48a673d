//! TelegramMessenger -- concrete [`Messenger`] implementation for the
//! Telegram Bot API.
//!
//! Every call is a JSON `POST {api_base}/bot{token}/{method}`. The token is
//! wrapped in [`secrecy::SecretString`] and is only exposed while building
//! the request URL; transport errors are stripped of the URL before they
//! are turned into [`TransportError`] so the token never reaches logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use catchpost_core::transport::messenger::Messenger;
use catchpost_types::config::TelegramConfig;
use catchpost_types::error::TransportError;
use catchpost_types::ids::{ChatId, MediaRef, MessageRef};
use catchpost_types::keyboard::Keyboard;

use super::types::{
    AnswerCallbackQuery, ApiResponse, EditMessageReplyMarkup, EditMessageText, InlineKeyboardMarkup,
    InputMediaPhoto, SendDocument, SendMediaGroup, SendMessage, SendPhoto, SentMessage,
};

/// Longest caption Telegram accepts on a photo, in characters.
pub const CAPTION_LIMIT: usize = 1024;

/// Most photos one media group may hold.
const MEDIA_GROUP_LIMIT: usize = 10;

/// Telegram Bot API client.
pub struct TelegramMessenger {
    client: reqwest::Client,
    token: SecretString,
    api_base: String,
}

impl std::fmt::Debug for TelegramMessenger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramMessenger")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl TelegramMessenger {
    pub fn new(token: SecretString, config: &TelegramConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            token,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token.expose_secret(), method)
    }

    /// Invoke a Bot API method and unwrap the response envelope.
    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(method))
            .json(body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.without_url().to_string()))?;

        if !envelope.ok {
            let error = TransportError::Api {
                code: envelope.error_code.unwrap_or(status.as_u16()),
                description: envelope.description.unwrap_or_default(),
            };
            tracing::debug!(method, %error, "Bot API call rejected");
            return Err(error);
        }

        envelope
            .result
            .ok_or_else(|| TransportError::Decode(format!("{method}: response has no result")))
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, TransportError> {
        let body = SendMessage {
            chat_id: chat_id.0,
            text,
            reply_markup: keyboard.map(InlineKeyboardMarkup::from),
        };
        let sent: SentMessage = self.call("sendMessage", &body).await?;
        Ok(sent.into())
    }

    /// Follow media with a caption that did not fit on it. The media has
    /// already been delivered, so a failure here is only logged.
    async fn send_detached_caption(&self, chat_id: ChatId, attached: Option<&str>, caption: &str) {
        if attached.is_some() || caption.is_empty() {
            return;
        }
        if let Err(e) = self.send_message(chat_id, caption, None).await {
            warn!(chat_id = %chat_id, error = %e, "Failed to send caption after media");
        }
    }
}

impl From<SentMessage> for MessageRef {
    fn from(sent: SentMessage) -> Self {
        MessageRef::new(ChatId(sent.chat.id), sent.message_id)
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(err.without_url().to_string())
    }
}

/// Telegram refuses edits that change nothing; for us that is success.
fn is_not_modified(err: &TransportError) -> bool {
    matches!(
        err,
        TransportError::Api { code: 400, description } if description.contains("message is not modified")
    )
}

/// `sendPhoto` refuses file ids that belong to documents.
fn is_file_type_mismatch(err: &TransportError) -> bool {
    matches!(
        err,
        TransportError::Api { code: 400, description } if description.contains("type of file mismatch")
    )
}

fn ignore_not_modified(result: Result<serde_json::Value, TransportError>) -> Result<(), TransportError> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if is_not_modified(&err) => Ok(()),
        Err(err) => Err(err),
    }
}

/// Caption to attach to media, or `None` when it must go separately.
fn fitting_caption(caption: &str) -> Option<&str> {
    if caption.is_empty() || caption.chars().count() > CAPTION_LIMIT {
        None
    } else {
        Some(caption)
    }
}

impl Messenger for TelegramMessenger {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, TransportError> {
        self.send_message(chat_id, text, keyboard).await
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &MediaRef,
        caption: &str,
    ) -> Result<MessageRef, TransportError> {
        let attached = fitting_caption(caption);
        let body = SendPhoto {
            chat_id: chat_id.0,
            photo: photo.as_str(),
            caption: attached,
        };
        let sent: SentMessage = match self.call("sendPhoto", &body).await {
            Err(err) if is_file_type_mismatch(&err) => {
                let body = SendDocument {
                    chat_id: chat_id.0,
                    document: photo.as_str(),
                    caption: attached,
                };
                self.call("sendDocument", &body).await?
            }
            other => other?,
        };

        self.send_detached_caption(chat_id, attached, caption).await;
        Ok(sent.into())
    }

    async fn send_photo_group(
        &self,
        chat_id: ChatId,
        photos: &[MediaRef],
        caption: &str,
    ) -> Result<Vec<MessageRef>, TransportError> {
        let attached = fitting_caption(caption);
        let media = photos
            .iter()
            .take(MEDIA_GROUP_LIMIT)
            .enumerate()
            .map(|(i, photo)| InputMediaPhoto::new(photo.as_str(), if i == 0 { attached } else { None }))
            .collect();
        let body = SendMediaGroup {
            chat_id: chat_id.0,
            media,
        };
        let sent: Vec<SentMessage> = self.call("sendMediaGroup", &body).await?;

        self.send_detached_caption(chat_id, attached, caption).await;
        Ok(sent.into_iter().map(MessageRef::from).collect())
    }

    async fn edit_message(
        &self,
        message: &MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        let body = EditMessageText {
            chat_id: message.chat_id.0,
            message_id: message.message_id,
            text,
            reply_markup: keyboard.map(InlineKeyboardMarkup::from),
        };
        ignore_not_modified(self.call("editMessageText", &body).await)
    }

    async fn edit_controls(
        &self,
        message: &MessageRef,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        let body = EditMessageReplyMarkup {
            chat_id: message.chat_id.0,
            message_id: message.message_id,
            reply_markup: keyboard.map(InlineKeyboardMarkup::from),
        };
        ignore_not_modified(self.call("editMessageReplyMarkup", &body).await)
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        alert: bool,
    ) -> Result<(), TransportError> {
        let body = AnswerCallbackQuery {
            callback_query_id: callback_id,
            text,
            show_alert: alert && text.is_some(),
        };
        let _: bool = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }
}
