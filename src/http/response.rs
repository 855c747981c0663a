use serde_json::{json, Value};
use vercel_runtime::{Body, Response, StatusCode};

use crate::error::AppError;
use crate::services::chat::RETRY_REPLY;

pub const REPEAT_REPLY: &str = "다시 한 번 말씀해 주세요.";

/// Status and body for an error. Upstream and internal details stay in the logs.
pub fn error_response(err: &AppError) -> (StatusCode, Value) {
    match err {
        AppError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            json!({"error":"Validation","detail":msg,"reply":REPEAT_REPLY}),
        ),
        AppError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({"error":"Unauthorized"})),
        AppError::External(_) => (
            StatusCode::BAD_GATEWAY,
            json!({"error":"Upstream","reply":RETRY_REPLY}),
        ),
        AppError::Other(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error":"Internal","reply":RETRY_REPLY}),
        ),
    }
}

pub fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> anyhow::Result<Response<Body>> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(value)?.into())?)
}

pub fn empty_response(status: StatusCode) -> anyhow::Result<Response<Body>> {
    Ok(Response::builder().status(status).body(Body::Empty)?)
}

pub fn method_not_allowed() -> anyhow::Result<Response<Body>> {
    Ok(Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Allow", "POST")
        .header("Content-Type", "application/json")
        .body(json!({"error": "POST only"}).to_string().into())?)
}
