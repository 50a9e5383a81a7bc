use std::path::PathBuf;

use http::StatusCode;
use scrivener_core::HttpError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures reading or writing a value file
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file does not exist
    #[error("{field} file \"{}\" is missing", path.display())]
    NotFound { path: PathBuf, field: &'static str },

    /// The file exists but holds no usable value
    #[error("{field} is missing in \"{}\"", path.display())]
    MissingValue { path: PathBuf, field: &'static str },

    /// The file is not valid JSON
    #[error("{field} file \"{}\" is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to access \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Whether the value is simply not configured yet
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::MissingValue { .. })
    }
}

impl HttpError for StoreError {
    fn status_code(&self) -> StatusCode {
        if self.is_absent() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_kind(&self) -> &'static str {
        if self.is_absent() { "not_found" } else { "storage_error" }
    }

    fn client_message(&self) -> String {
        match self {
            Self::NotFound { field, .. } | Self::MissingValue { field, .. } => format!("No {field} configured"),
            Self::Corrupt { field, .. } => format!("Stored {field} is unreadable"),
            Self::Io { .. } => "Failed to access storage".to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        Some(self.to_string())
    }
}
