use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Upper bound accepted by the Whisper transcription API (25 MiB)
pub const TRANSCRIPTION_SIZE_LIMIT: u64 = 25 * 1024 * 1024;

/// Speech-to-text upstream configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    #[serde(default = "default_model")]
    pub model: String,
    /// Language hint (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_response_format")]
    pub response_format: String,
    /// Upstream request timeout
    #[serde(default = "default_timeout", deserialize_with = "crate::duration::deserialize")]
    pub timeout: Duration,
    /// Largest audio payload forwarded upstream, in bytes
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            language: default_language(),
            response_format: default_response_format(),
            timeout: default_timeout(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

pub(crate) fn default_base_url() -> Url {
    Url::parse("https://api.openai.com/v1").expect("must be valid URL")
}

fn default_model() -> String {
    "whisper-1".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_response_format() -> String {
    "json".to_string()
}

pub(crate) const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_max_upload_size() -> u64 {
    TRANSCRIPTION_SIZE_LIMIT
}
