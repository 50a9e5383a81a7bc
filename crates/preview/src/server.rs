use axum::{Json, Router, extract::rejection::JsonRejection, routing::post};
use http::StatusCode;
use scrivener_core::Failure;
use serde::Deserialize;

use crate::{PreviewContent, parse_content};

/// Create the router for `/preview`
pub fn endpoint_router() -> Router {
    Router::new().route("/preview", post(preview))
}

#[derive(Debug, Deserialize)]
struct PreviewRequest {
    content: String,
}

async fn preview(body: Result<Json<PreviewRequest>, JsonRejection>) -> Result<Json<PreviewContent>, Failure> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected preview request");
        Failure::new(StatusCode::BAD_REQUEST, "validation_error", "Invalid content.")
    })?;

    let content = parse_content(&request.content);
    tracing::debug!(
        text_boxes = content.text_boxes.len(),
        tables = content.tables.len(),
        "parsed preview content"
    );

    Ok(Json(content))
}
