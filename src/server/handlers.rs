use super::types::{ErrorResponse, GenerateRequestBody, HealthResponse, TextResponse};
use crate::{
    Error, Result,
    generation::{GenerationMode, GenerationOutput, GenerationRequest, Generator},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

type ErrorReply = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<Generator>,
    pub mode_fallback: Option<GenerationMode>,
}

fn error_reply(status: StatusCode, message: impl Into<String>) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Picks the generation mode for a request. Absent, non-string or unknown
/// values take the fallback mode, or are rejected when none is configured.
pub fn resolve_mode(
    requested: Option<&Value>,
    fallback: Option<GenerationMode>,
) -> Result<GenerationMode> {
    let parsed = match requested {
        None | Some(Value::Null) => Err(Error::invalid_request(
            "Missing 'mode', expected 'text' or 'image'",
        )),
        Some(Value::String(mode)) => mode.parse::<GenerationMode>(),
        Some(other) => Err(Error::invalid_request(format!(
            "Unknown mode {}, expected 'text' or 'image'",
            other
        ))),
    };

    match (parsed, fallback) {
        (Ok(mode), _) => Ok(mode),
        (Err(e), Some(mode)) => {
            warn!("{}; falling back to {} mode", e, mode);
            Ok(mode)
        }
        (Err(e), None) => Err(e),
    }
}

pub async fn generate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequestBody>, JsonRejection>,
) -> std::result::Result<Response, ErrorReply> {
    let request_id = Uuid::new_v4();

    let Json(body) = payload.map_err(|rejection| {
        warn!("Rejected request {}: {}", request_id, rejection.body_text());
        error_reply(rejection.status(), rejection.body_text())
    })?;

    let mode = resolve_mode(body.mode.as_ref(), state.mode_fallback).map_err(|e| {
        warn!("Rejected request {}: {}", request_id, e);
        error_reply(e.status_code(), e.to_string())
    })?;

    info!(
        "Received {} generation request {} ({} byte prompt)",
        mode,
        request_id,
        body.prompt.len()
    );

    let request = GenerationRequest::new(body.prompt, mode);
    match state.generator.generate(&request).await {
        Ok(GenerationOutput::Text(generated_text)) => {
            info!("Completed text request {}", request_id);
            Ok(Json(TextResponse { generated_text }).into_response())
        }
        Ok(GenerationOutput::Image(image)) => {
            info!(
                "Completed image request {} ({} bytes, {})",
                request_id,
                image.data.len(),
                image.content_type
            );
            Ok(([(header::CONTENT_TYPE, image.content_type)], image.data).into_response())
        }
        Err(e) => {
            error!("Failed to process request {}: {}", request_id, e);
            Err(error_reply(e.status_code(), e.to_string()))
        }
    }
}

pub async fn method_not_allowed() -> ErrorReply {
    error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
