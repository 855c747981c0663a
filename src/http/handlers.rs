//! Endpoint bodies shared by the `api/` entry points.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;
use vercel_runtime::StatusCode;

use super::response::error_response;
use crate::{
    clients::{ChatModel, Transcriber},
    config::DialogueConfig,
    dialogue::PendingConfirmation,
    error::AppError,
    models::chat::ChatRequest,
    services::{chat::respond, transcribe::transcribe},
};

/// Runs one chat turn from a raw JSON body. Error replies carry the caller's
/// confirmation state whenever the body holds one, so a failed turn never
/// drops a number that is waiting for confirmation.
pub async fn chat_reply(
    model: &dyn ChatModel,
    config: &DialogueConfig,
    body: &[u8],
) -> (StatusCode, Value) {
    if body.is_empty() {
        return error_response(&AppError::Validation("Empty body".into()));
    }
    let parsed: ChatRequest = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            let err = AppError::Validation(format!("Invalid JSON: {e}"));
            return with_pending(error_response(&err), pending_in(body));
        }
    };

    let pending = parsed.pending;
    match respond(model, config, parsed).await {
        Ok(reply) => match serde_json::to_value(&reply) {
            Ok(v) => (StatusCode::OK, v),
            Err(e) => with_pending(error_response(&AppError::Other(e.into())), Some(pending)),
        },
        Err(e) => {
            if matches!(e, AppError::External(_) | AppError::Other(_)) {
                error!(error = %e, "chat turn failed");
            }
            with_pending(error_response(&e), Some(pending))
        }
    }
}

/// Transcribes a raw audio body. Upstream failures read `{"error":"Whisper failed"}`.
pub async fn transcription_reply(
    transcriber: &dyn Transcriber,
    audio: Vec<u8>,
    content_type: Option<&str>,
) -> (StatusCode, Value) {
    match transcribe(transcriber, audio, content_type).await {
        Ok(reply) => (StatusCode::OK, json!({"text": reply.text})),
        Err(e @ AppError::Validation(_)) => error_response(&e),
        Err(e) => {
            error!(error = %e, "transcription failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Whisper failed"}),
            )
        }
    }
}

// Best effort: the body may be valid JSON that is not a valid request.
fn pending_in(body: &[u8]) -> Option<PendingConfirmation> {
    let value: Value = serde_json::from_slice(body).ok()?;
    PendingConfirmation::deserialize(&value).ok()
}

fn with_pending(
    (status, mut body): (StatusCode, Value),
    pending: Option<PendingConfirmation>,
) -> (StatusCode, Value) {
    if let (Some(pending), Some(obj)) = (pending, body.as_object_mut()) {
        obj.insert("needConfirm".into(), json!(pending.awaiting_confirmation));
        obj.insert("heardNumber".into(), json!(pending.heard_number));
    }
    (status, body)
}
