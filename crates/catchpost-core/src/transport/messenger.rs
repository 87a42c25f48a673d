//! Messaging platform client trait.
//!
//! The surface the core needs from a chat platform: plain and photo
//! messages, photo groups, message edits, and callback acknowledgement.
//! Implementations live in catchpost-infra.

use std::future::Future;

use catchpost_types::error::TransportError;
use catchpost_types::ids::{ChatId, MediaRef, MessageRef};
use catchpost_types::keyboard::Keyboard;

pub trait Messenger: Send + Sync {
    /// Send a text message, optionally with an inline keyboard.
    fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> impl Future<Output = Result<MessageRef, TransportError>> + Send;

    /// Send a single photo with a caption.
    fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &MediaRef,
        caption: &str,
    ) -> impl Future<Output = Result<MessageRef, TransportError>> + Send;

    /// Send photos as one group; the caption is attached to the first one.
    fn send_photo_group(
        &self,
        chat_id: ChatId,
        photos: &[MediaRef],
        caption: &str,
    ) -> impl Future<Output = Result<Vec<MessageRef>, TransportError>> + Send;

    /// Replace the text (and keyboard) of a sent message. `None` removes the
    /// keyboard. Editing to identical content is not an error.
    fn edit_message(
        &self,
        message: &MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Replace only the keyboard of a sent message.
    fn edit_controls(
        &self,
        message: &MessageRef,
        keyboard: Option<&Keyboard>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Acknowledge a button press, optionally showing `text` to the presser
    /// (as a modal alert when `alert` is set).
    fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        alert: bool,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}
