#![allow(clippy::must_use_candidate, clippy::missing_errors_doc, clippy::module_name_repetitions)]

//! Dictation endpoints
//!
//! Upload intake, transcription, template merge and response assembly for
//! `/asr`, `/audio-update` and `/ai-update`.

mod error;
mod intake;
mod pipeline;
mod recording;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    routing::post,
};
use scrivener_core::Failure;
use serde::Deserialize;

pub use error::{IntakeError, PipelineError};
pub use intake::TEMPLATE_UPLOAD_LIMIT;
pub use pipeline::{AsrResponse, CorrectedText, Pipeline};
use intake::{Asr, AudioUpdate, ExtractUpload};

/// Create the router for the dictation endpoints
///
/// Upload routes enforce their own size bounds while streaming, so the
/// default body limit is lifted on them.
pub fn endpoint_router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/asr", post(asr).layer(DefaultBodyLimit::disable()))
        .route("/audio-update", post(audio_update).layer(DefaultBodyLimit::disable()))
        .route("/ai-update", post(ai_update))
        .with_state(pipeline)
}

async fn asr(
    State(pipeline): State<Arc<Pipeline>>,
    ExtractUpload(upload, _): ExtractUpload<Asr>,
) -> Result<Json<AsrResponse>, Failure> {
    tracing::debug!("asr handler called");

    pipeline
        .asr(upload)
        .await
        .map(Json)
        .map_err(|e| pipeline.diagnostics.fail(&e))
}

async fn audio_update(
    State(pipeline): State<Arc<Pipeline>>,
    ExtractUpload(upload, _): ExtractUpload<AudioUpdate>,
) -> Result<Json<CorrectedText>, Failure> {
    tracing::debug!("audio update handler called");

    pipeline
        .audio_update(upload)
        .await
        .map(Json)
        .map_err(|e| pipeline.diagnostics.fail(&e))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextUpdate {
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    template_text: Option<String>,
}

async fn ai_update(
    State(pipeline): State<Arc<Pipeline>>,
    body: Result<Json<TextUpdate>, JsonRejection>,
) -> Result<Json<CorrectedText>, Failure> {
    let Json(body) = body.map_err(|_| pipeline.diagnostics.fail(&PipelineError::MissingFields))?;

    pipeline
        .text_update(
            body.transcript.as_deref().unwrap_or_default(),
            body.template_text.as_deref().unwrap_or_default(),
        )
        .await
        .map(Json)
        .map_err(|e| pipeline.diagnostics.fail(&e))
}
