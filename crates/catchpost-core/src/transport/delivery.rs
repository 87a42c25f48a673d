//! Outbound delivery of wizard actions.
//!
//! Prompts replace the message whose button was pressed when there is one,
//! falling back to a new message if the edit fails. Notifications answer
//! the pending button press as an alert; otherwise they go out as plain
//! messages. A button press is always acknowledged exactly once.

use catchpost_types::error::TransportError;
use catchpost_types::event::Action;
use catchpost_types::ids::{ChatId, MessageRef};
use tracing::{debug, warn};

use super::Messenger;

/// Deliver `actions` in order.
///
/// Delivery is best-effort: every action is attempted and the first
/// failure, if any, is returned once all of them have run.
pub async fn deliver<M: Messenger>(
    messenger: &M,
    origin: Option<&MessageRef>,
    callback_id: Option<&str>,
    actions: Vec<Action>,
) -> Result<(), TransportError> {
    let mut answered = false;
    let mut first_error = None;

    for action in actions {
        let outcome = match action {
            Action::ShowPrompt {
                user_id,
                text,
                controls,
            } => {
                let chat = ChatId::from(user_id);
                match origin {
                    Some(message) => {
                        match messenger.edit_message(message, &text, controls.as_ref()).await {
                            Ok(()) => Ok(()),
                            Err(e) => {
                                debug!(error = %e, "Edit failed, sending prompt as new message");
                                messenger
                                    .send_text(chat, &text, controls.as_ref())
                                    .await
                                    .map(|_| ())
                            }
                        }
                    }
                    None => messenger
                        .send_text(chat, &text, controls.as_ref())
                        .await
                        .map(|_| ()),
                }
            }
            Action::UpdateControls { controls, .. } => match origin {
                Some(message) => messenger.edit_controls(message, Some(&controls)).await,
                None => {
                    debug!("No origin message for control update, skipping");
                    Ok(())
                }
            },
            Action::Notify { user_id, text } => match callback_id.filter(|_| !answered) {
                Some(id) => {
                    answered = true;
                    messenger.answer_callback(id, Some(&text), true).await
                }
                None => messenger
                    .send_text(ChatId::from(user_id), &text, None)
                    .await
                    .map(|_| ()),
            },
        };

        if let Err(e) = outcome {
            warn!(error = %e, "Failed to deliver wizard action");
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }

    if let (Some(id), false) = (callback_id, answered) {
        if let Err(e) = messenger.answer_callback(id, None, false).await {
            debug!(error = %e, "Failed to acknowledge callback");
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
