use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::Serialize;

use crate::HttpError;

/// Whether failure bodies may carry diagnostic details
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    expose: bool,
}

impl Diagnostics {
    pub const fn new(expose: bool) -> Self {
        Self { expose }
    }

    pub const fn exposed(self) -> bool {
        self.expose
    }

    /// Render a domain error into a failure response
    pub fn fail<E: HttpError + ?Sized>(self, error: &E) -> Failure {
        Failure::from_error(error, self)
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FailureBody {
    pub success: bool,
    pub message: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A failure ready to be sent to the client
#[derive(Debug, Clone)]
pub struct Failure {
    status: StatusCode,
    body: FailureBody,
}

impl Failure {
    pub fn from_error<E: HttpError + ?Sized>(error: &E, diagnostics: Diagnostics) -> Self {
        Self {
            status: error.status_code(),
            body: FailureBody {
                success: false,
                message: error.client_message(),
                error: error.error_kind().to_string(),
                details: diagnostics.exposed().then(|| error.details()).flatten(),
            },
        }
    }

    /// Build a failure that has no domain error behind it
    pub fn new(status: StatusCode, kind: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: FailureBody {
                success: false,
                message: message.into(),
                error: kind.to_string(),
                details: None,
            },
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn body(&self) -> &FailureBody {
        &self.body
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
