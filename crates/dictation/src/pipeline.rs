use std::{sync::Arc, time::Instant};

use merge::{MergeEngine, MergeError, MergeOutcome, MergeResult};
use scrivener_core::{Diagnostics, HttpError};
use scrivener_telemetry::PipelineMetrics;
use serde::Serialize;
use stt::{SttError, Transcriber, Transcript, TranscriptionRequest};

use crate::{
    error::PipelineError,
    intake::{IntakeSettings, StagedAudio, Upload},
    recording::Recordings,
};

/// Shared state of the dictation endpoints
pub struct Pipeline {
    transcriber: Arc<dyn Transcriber>,
    engine: Arc<MergeEngine>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) intake: IntakeSettings,
    recordings: Option<Recordings>,
    metrics: PipelineMetrics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsrResponse {
    pub success: bool,
    pub message: &'static str,
    pub transcript: Transcript,
    pub chat_response: MergeResult,
    pub recording_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectedText {
    pub success: bool,
    pub corrected_text: String,
}

impl Pipeline {
    pub fn new(config: &scrivener_config::Config, transcriber: Arc<dyn Transcriber>, engine: Arc<MergeEngine>) -> Self {
        // Never stage more than the backend would accept
        let asr_limit = config.transcription.max_upload_size.min(transcriber.max_payload_size());

        Self {
            transcriber,
            engine,
            diagnostics: Diagnostics::new(config.server.environment.exposes_details()),
            intake: IntakeSettings {
                staging_dir: config.storage.uploads_dir.clone(),
                asr_limit,
            },
            recordings: config
                .storage
                .recordings_dir
                .clone()
                .map(|dir| Recordings::new(dir, &config.server.public_url)),
            metrics: PipelineMetrics::new(),
        }
    }

    /// Transcribe a recording and merge it into the selected text
    ///
    /// The merge outcome is reported as-is, failure included.
    pub(crate) async fn asr(&self, upload: Upload) -> Result<AsrResponse, PipelineError> {
        let Upload { audio, text } = upload;
        let selected_text = text.unwrap_or_default();

        self.engine.ensure_prompt().await?;
        let transcript = self.transcribe(&audio).await?;
        let chat_response = self.merge(transcript.as_str(), &selected_text).await?;
        let recording_url = self.keep(audio).await;

        Ok(AsrResponse {
            success: true,
            message: "Audio processed successfully",
            transcript,
            chat_response,
            recording_url,
        })
    }

    /// Transcribe a recording and merge it into the template
    pub(crate) async fn audio_update(&self, upload: Upload) -> Result<CorrectedText, PipelineError> {
        let Upload { audio, text } = upload;
        let template = text.unwrap_or_default();

        self.engine.ensure_prompt().await?;
        let transcript = self.transcribe(&audio).await?;
        drop(audio);

        let result = self.merge(transcript.as_str(), &template).await?;
        corrected(result)
    }

    /// Merge an already transcribed text into the template
    pub(crate) async fn text_update(&self, transcript: &str, template: &str) -> Result<CorrectedText, PipelineError> {
        if transcript.trim().is_empty() || template.trim().is_empty() {
            return Err(PipelineError::MissingFields);
        }

        let result = self.merge(transcript, template).await?;
        corrected(result)
    }

    async fn transcribe(&self, audio: &StagedAudio) -> Result<Transcript, SttError> {
        tracing::debug!(filename = %audio.filename(), size = audio.size(), "transcribing upload");

        let start = Instant::now();
        let result = self
            .transcriber
            .transcribe(TranscriptionRequest::new(audio.payload()))
            .await;

        match &result {
            Ok(transcript) => {
                tracing::debug!(transcript_chars = transcript.as_str().len(), "transcription complete");
                self.metrics.record_transcription(start, "success");
            }
            Err(e) => {
                tracing::warn!(error = %e, backend = self.transcriber.name(), "transcription failed");
                self.metrics.record_transcription(start, e.error_kind());
            }
        }

        result
    }

    async fn merge(&self, transcript: &str, template: &str) -> Result<MergeResult, MergeError> {
        let start = Instant::now();
        let result = self.engine.merge(transcript, template).await;

        let outcome = match &result {
            Ok(merged) => merged.failure().map_or("success", HttpError::error_kind),
            Err(e) => e.error_kind(),
        };
        self.metrics.record_merge(start, outcome);

        result
    }

    async fn keep(&self, audio: StagedAudio) -> Option<String> {
        let recordings = self.recordings.as_ref()?;

        match recordings.keep(audio).await {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to keep recording");
                None
            }
        }
    }
}

fn corrected(result: MergeResult) -> Result<CorrectedText, PipelineError> {
    match result.outcome {
        MergeOutcome::Success { merged_text } => Ok(CorrectedText {
            success: true,
            corrected_text: merged_text,
        }),
        MergeOutcome::Failure { reason } => Err(reason.into()),
    }
}
