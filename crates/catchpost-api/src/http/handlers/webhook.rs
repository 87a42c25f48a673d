//! Telegram webhook receiver.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;

use catchpost_infra::telegram::types::Update;
use catchpost_infra::telegram::update::decode_update;

use crate::dispatch::dispatch;
use crate::http::error::AppError;
use crate::state::AppState;

/// Header Telegram echoes the webhook's `secret_token` in.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// POST /webhook - Receive one Telegram update.
///
/// Answers 401 on a secret mismatch and 400 on an undecodable body.
/// Every well-formed update is acknowledged with 200 once processed,
/// whatever the outcome, so the platform does not redeliver it.
pub async fn receive_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(expected) = state.webhook_secret.as_deref() {
        let given = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if given != Some(expected) {
            tracing::warn!("Rejected webhook call with a missing or wrong secret token");
            return Err(AppError::Unauthorized("invalid webhook secret".to_string()));
        }
    }

    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("malformed update: {e}")))?;

    tracing::debug!(update_id = update.update_id, "Received update");
    dispatch(&state, decode_update(update)).await;

    Ok(Json(serde_json::json!({ "ok": true })))
}
