#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Speech-to-text adapter
//!
//! Forwards recorded audio to an OpenAI-compatible transcription endpoint
//! and translates every upstream failure into an [`SttError`].

mod error;
mod http_client;
mod provider;
mod types;

use std::sync::Arc;

use scrivener_keystore::KeyStore;

pub use error::{Result, SttError};
pub use provider::{Transcriber, whisper::WhisperTranscriber};
pub use types::{AudioPayload, AudioSource, Transcript, TranscriptionRequest};

/// Build the configured transcriber
pub fn build_transcriber(config: &scrivener_config::Config, keystore: Arc<KeyStore>) -> Arc<dyn Transcriber> {
    tracing::debug!(
        model = %config.transcription.model,
        base_url = %config.transcription.base_url,
        "initializing transcriber"
    );

    Arc::new(WhisperTranscriber::new(&config.transcription, keystore))
}
