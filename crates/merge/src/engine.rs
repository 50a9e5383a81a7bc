use std::sync::Arc;

use scrivener_keystore::KeyStore;

use crate::{
    client::{CompletionClient, CompletionError},
    error::{MergeError, MergeFailure},
    rules::post_process,
    types::{MergeOutcome, MergeRequest, MergeResult},
};

/// Merges dictated transcripts into template fragments
///
/// Holds no per-request state: every call resolves its own credential and
/// prompt and builds its own messages.
pub struct MergeEngine {
    client: Arc<dyn CompletionClient>,
    keystore: Arc<KeyStore>,
}

impl MergeEngine {
    pub fn new(client: Arc<dyn CompletionClient>, keystore: Arc<KeyStore>) -> Self {
        Self { client, keystore }
    }

    /// Fail early when no merge prompt is stored
    ///
    /// Lets callers skip an upstream transcription whose result could never
    /// be merged.
    pub async fn ensure_prompt(&self) -> Result<(), MergeError> {
        self.keystore.prompt().await.map_err(MergeError::Configuration)?;
        Ok(())
    }

    /// Merge `transcript` into `template`
    ///
    /// Expected upstream failures come back inside the [`MergeResult`];
    /// only a missing credential or prompt is returned as an error.
    pub async fn merge(&self, transcript: &str, template: &str) -> Result<MergeResult, MergeError> {
        let result = |outcome| MergeResult {
            original_template: template.to_string(),
            spoken_text: transcript.to_string(),
            outcome,
        };

        if transcript.trim().is_empty() && template.trim().is_empty() {
            tracing::debug!("merge skipped: nothing to merge");
            return Ok(result(MergeOutcome::Failure {
                reason: MergeFailure::EmptyInput,
            }));
        }

        let api_key = self.keystore.credential().await.map_err(MergeError::Configuration)?;
        let prompt = self.keystore.prompt().await.map_err(MergeError::Configuration)?;

        let request = MergeRequest {
            template: template.to_string(),
            transcript: transcript.to_string(),
            prompt,
        };

        tracing::debug!(
            template_chars = template.len(),
            transcript_chars = transcript.len(),
            "requesting template merge"
        );

        let outcome = match self.client.complete(&api_key, &request.messages()).await {
            Ok(content) => match post_process(&content) {
                Some(merged_text) => MergeOutcome::Success { merged_text },
                None => MergeOutcome::Failure {
                    reason: MergeFailure::EmptyMergeResult,
                },
            },
            Err(e) => MergeOutcome::Failure { reason: e.into() },
        };

        if let MergeOutcome::Failure { reason } = &outcome {
            tracing::warn!(reason = %reason, "template merge failed");
        }

        Ok(result(outcome))
    }
}

impl From<CompletionError> for MergeFailure {
    fn from(error: CompletionError) -> Self {
        match error {
            CompletionError::Timeout => Self::Timeout,
            CompletionError::Upstream { status, message } => Self::Upstream { status, message },
            CompletionError::Connection(message) => Self::Connection(message),
            CompletionError::MalformedResponse(message) => Self::MalformedResponse(message),
        }
    }
}
