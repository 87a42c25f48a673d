//! Routing of decoded updates to the wizard and moderation services.
//!
//! Failures are logged here and never propagated: the platform would
//! otherwise redeliver the same update indefinitely.

use catchpost_core::transport::messenger::Messenger;
use catchpost_infra::telegram::update::Decoded;
use catchpost_types::event::Inbound;

use crate::state::AppState;

pub async fn dispatch(state: &AppState, decoded: Decoded) {
    match decoded {
        Decoded::Ignored {
            callback_id,
            reason,
        } => {
            tracing::debug!(reason, "Ignoring update");
            if let Some(id) = callback_id {
                if let Err(e) = state.messenger.answer_callback(&id, None, false).await {
                    tracing::warn!("Failed to acknowledge ignored button press: {e}");
                }
            }
        }
        Decoded::Event(Inbound::Wizard(event)) => {
            let user_id = event.user_id;
            match state.wizard.handle(event).await {
                Ok(step) => tracing::debug!(%user_id, %step, "Wizard event handled"),
                Err(e) => tracing::error!(%user_id, "Failed to handle wizard event: {e}"),
            }
        }
        Decoded::Event(Inbound::Moderation(event)) => {
            match state.moderation.resolve(&event).await {
                Ok(resolution) => tracing::info!(
                    user_id = %event.target,
                    decision = %event.decision,
                    ?resolution,
                    "Moderation decision handled"
                ),
                Err(e) => tracing::error!(
                    user_id = %event.target,
                    decision = %event.decision,
                    "Failed to resolve moderation decision: {e}"
                ),
            }
        }
    }
}
