//! Provider webhook endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::WebhookAck;

/// POST /webhook - Record an import status callback from Dromo
pub async fn receive_webhook(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<WebhookAck>> {
    let Json(payload) = payload.map_err(|e| Error::validation(e.body_text()))?;
    let outcome = state.webhooks().handle(&payload)?;
    Ok(Json(outcome.ack))
}
