use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Body, Client, multipart};
use scrivener_config::TranscriptionConfig;
use scrivener_keystore::KeyStore;
use secrecy::ExposeSecret;
use tokio_util::io::ReaderStream;

use crate::{
    error::SttError,
    http_client::http_client,
    types::{AudioSource, Transcript, TranscriptionRequest},
};

use super::Transcriber;

/// `OpenAI` Whisper-compatible transcriber
pub struct WhisperTranscriber {
    client: Client,
    endpoint: String,
    model: String,
    language: String,
    response_format: String,
    timeout: Duration,
    max_payload_size: u64,
    keystore: Arc<KeyStore>,
}

impl WhisperTranscriber {
    pub fn new(config: &TranscriptionConfig, keystore: Arc<KeyStore>) -> Self {
        let base = config.base_url.as_str().trim_end_matches('/');

        Self {
            client: http_client(),
            endpoint: format!("{base}/audio/transcriptions"),
            model: config.model.clone(),
            language: config.language.clone(),
            response_format: config.response_format.clone(),
            timeout: config.timeout,
            max_payload_size: config.max_upload_size,
            keystore,
        }
    }

    async fn file_part(&self, request: &TranscriptionRequest) -> crate::error::Result<multipart::Part> {
        let audio = &request.audio;

        let body = match &audio.source {
            AudioSource::Memory(bytes) => Body::from(bytes.clone()),
            AudioSource::File(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| SttError::InvalidRequest(format!("Staged audio is unreadable: {e}")))?;
                Body::wrap_stream(ReaderStream::new(file))
            }
        };

        multipart::Part::stream_with_length(body, audio.size)
            .file_name(audio.filename.clone())
            .mime_str(&audio.content_type)
            .map_err(|e| SttError::InvalidRequest(format!("Invalid content type: {e}")))
    }

    fn parse_transcript(&self, body: &str) -> crate::error::Result<Transcript> {
        if !self.response_format.ends_with("json") {
            return Ok(Transcript::new(body.trim()));
        }

        serde_json::from_str::<WhisperResponse>(body)
            .map(|r| Transcript::new(r.text))
            .map_err(|e| {
                tracing::error!("Failed to parse Whisper response: {e}");
                SttError::MalformedResponse(e.to_string())
            })
    }
}

#[derive(serde::Deserialize)]
struct WhisperResponse {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, request: TranscriptionRequest) -> crate::error::Result<Transcript> {
        let size = request.audio.size;
        if size > self.max_payload_size {
            tracing::warn!(size, limit = self.max_payload_size, "audio payload rejected before upload");
            return Err(SttError::PayloadTooLarge {
                size,
                limit: self.max_payload_size,
            });
        }

        let api_key = self.keystore.credential().await.map_err(SttError::Configuration)?;

        tracing::debug!(
            bytes = size,
            model = %self.model,
            filename = %request.audio.filename,
            "Whisper transcription request"
        );

        let language = request.language.clone().unwrap_or_else(|| self.language.clone());
        let form = multipart::Form::new()
            .part("file", self.file_part(&request).await?)
            .text("model", self.model.clone())
            .text("language", language)
            .text("response_format", self.response_format.clone());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Whisper request failed: {e}");
                SttError::from_transport(&e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| SttError::from_transport(&e))?;

        if !status.is_success() {
            tracing::error!("Whisper API error ({status}): {body}");

            return Err(match status.as_u16() {
                400 => SttError::InvalidAudioFormat { details: body },
                code => SttError::Upstream {
                    status: code,
                    message: body,
                },
            });
        }

        let transcript = self.parse_transcript(&body)?;

        tracing::debug!(chars = transcript.as_str().len(), "Whisper transcription complete");

        Ok(transcript)
    }

    fn max_payload_size(&self) -> u64 {
        self.max_payload_size
    }

    fn name(&self) -> &str {
        "whisper"
    }
}
