use http::StatusCode;
use scrivener_core::HttpError;
use scrivener_keystore::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SttError>;

/// Transcription failures, grouped the way callers act on them
#[derive(Debug, Error)]
pub enum SttError {
    /// Credential could not be resolved; not retryable
    #[error("Transcription is not configured: {0}")]
    Configuration(#[source] StoreError),

    /// Payload exceeds the upstream bound; rejected before any network call
    #[error("File size of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },

    /// Request could not be assembled from the given metadata
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream rejected the audio encoding; the user should re-record
    #[error("Invalid audio file format. Please ensure the file is WAV or WebM with proper encoding.")]
    InvalidAudioFormat { details: String },

    /// No response within the configured timeout
    #[error("Transcription timed out")]
    Timeout,

    /// The upstream answered with a non-success status
    #[error("Transcription failed with status {status}")]
    Upstream { status: u16, message: String },

    /// Network or connection error
    #[error("Transcription failed: {0}")]
    Connection(String),

    /// The upstream answered 2xx with a body we cannot read
    #[error("Transcription returned an unreadable response")]
    MalformedResponse(String),
}

impl SttError {
    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Connection(error.to_string())
        }
    }
}

impl HttpError for SttError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidAudioFormat { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream { .. } | Self::Connection(_) | Self::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::PayloadTooLarge { .. } | Self::InvalidRequest(_) => "validation_error",
            Self::InvalidAudioFormat { .. } => "invalid_audio_format",
            Self::Timeout => "upstream_timeout",
            Self::Upstream { .. } | Self::Connection(_) | Self::MalformedResponse(_) => "upstream_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Configuration(e) => format!("Transcription is not configured: {}", e.client_message()),
            _ => self.to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Configuration(e) => Some(e.to_string()),
            Self::InvalidAudioFormat { details } => Some(details.clone()),
            Self::Upstream { message, .. } | Self::Connection(message) | Self::MalformedResponse(message) => {
                Some(message.clone())
            }
            _ => None,
        }
    }
}
