use http::StatusCode;
use scrivener_core::HttpError;
use scrivener_keystore::StoreError;
use thiserror::Error;

/// Programmer-error-class failure: the engine cannot run at all
#[derive(Debug, Error)]
pub enum MergeError {
    /// Credential or merge prompt is not available
    #[error("Template merge is not configured: {0}")]
    Configuration(#[source] StoreError),
}

impl HttpError for MergeError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_kind(&self) -> &'static str {
        "configuration_error"
    }

    fn client_message(&self) -> String {
        let Self::Configuration(e) = self;
        format!("Template merge is not configured: {}", e.client_message())
    }

    fn details(&self) -> Option<String> {
        let Self::Configuration(e) = self;
        Some(e.to_string())
    }
}

/// Expected failure of a merge, carried inside the result
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MergeFailure {
    /// Neither a transcript nor a template was supplied
    #[error("Nothing to merge: transcript and template are both empty")]
    EmptyInput,

    /// The upstream answered but left nothing usable
    #[error("Empty response from API")]
    EmptyMergeResult,

    #[error("Template merge timed out")]
    Timeout,

    #[error("Template merge failed with status {status}")]
    Upstream { status: u16, message: String },

    #[error("Template merge failed: {0}")]
    Connection(String),

    #[error("Template merge returned an unreadable response")]
    MalformedResponse(String),
}

impl HttpError for MergeFailure {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyInput => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::EmptyMergeResult | Self::Upstream { .. } | Self::Connection(_) | Self::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn error_kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "validation_error",
            Self::EmptyMergeResult => "empty_result",
            Self::Timeout => "upstream_timeout",
            Self::Upstream { .. } | Self::Connection(_) | Self::MalformedResponse(_) => "upstream_error",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Upstream { message, .. } | Self::Connection(message) | Self::MalformedResponse(message) => {
                Some(message.clone())
            }
            _ => None,
        }
    }
}
