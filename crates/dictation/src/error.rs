use http::StatusCode;
use merge::{MergeError, MergeFailure};
use scrivener_core::HttpError;
use stt::SttError;
use thiserror::Error;

/// Rejection of an uploaded form before any upstream call
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Expected a multipart/form-data upload")]
    NotMultipart(String),

    #[error("Malformed upload")]
    Malformed(String),

    #[error("No audio file provided")]
    MissingAudio,

    #[error("Invalid file type. Only WAV and WebM files are allowed.")]
    UnsupportedType { filename: String, content_type: String },

    #[error("Audio file exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },

    #[error("Field '{field}' exceeds the {limit} byte limit")]
    FieldTooLarge { field: String, limit: u64 },

    #[error("Failed to stage upload")]
    Staging(#[source] std::io::Error),
}

impl HttpError for IntakeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotMultipart(_) | Self::UnsupportedType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Malformed(_) | Self::MissingAudio => StatusCode::BAD_REQUEST,
            Self::TooLarge { .. } | Self::FieldTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Staging(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_kind(&self) -> &'static str {
        match self {
            Self::Staging(_) => "storage_error",
            _ => "validation_error",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::NotMultipart(details) | Self::Malformed(details) => Some(details.clone()),
            Self::UnsupportedType { filename, content_type } => {
                Some(format!("received '{filename}' declared as '{content_type}'"))
            }
            Self::Staging(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

/// Any failure of a dictation request
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Transcription(#[from] SttError),

    #[error(transparent)]
    Configuration(#[from] MergeError),

    #[error(transparent)]
    Merge(#[from] MergeFailure),

    #[error("Missing required fields: transcript and/or templateText")]
    MissingFields,
}

impl PipelineError {
    fn inner(&self) -> Option<&dyn HttpError> {
        match self {
            Self::Intake(e) => Some(e),
            Self::Transcription(e) => Some(e),
            Self::Configuration(e) => Some(e),
            Self::Merge(e) => Some(e),
            Self::MissingFields => None,
        }
    }
}

impl HttpError for PipelineError {
    fn status_code(&self) -> StatusCode {
        self.inner().map_or(StatusCode::BAD_REQUEST, HttpError::status_code)
    }

    fn error_kind(&self) -> &'static str {
        self.inner().map_or("validation_error", HttpError::error_kind)
    }

    fn client_message(&self) -> String {
        self.inner().map_or_else(|| self.to_string(), HttpError::client_message)
    }

    fn details(&self) -> Option<String> {
        self.inner().and_then(HttpError::details)
    }
}
