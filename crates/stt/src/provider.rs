pub(crate) mod whisper;

use async_trait::async_trait;

use crate::types::{Transcript, TranscriptionRequest};

/// A speech-to-text backend
///
/// Implementations make exactly one upstream call per invocation; retry
/// policy belongs to the caller.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe audio to text
    async fn transcribe(&self, request: TranscriptionRequest) -> crate::error::Result<Transcript>;

    /// Largest payload this backend accepts, in bytes
    fn max_payload_size(&self) -> u64;

    /// Get the backend name
    fn name(&self) -> &str;
}
