use http::StatusCode;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The failure envelope
/// in this crate turns them into `{"success": false, ...}` bodies.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error kind (e.g. `upstream_timeout`)
    fn error_kind(&self) -> &'static str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String {
        self.to_string()
    }

    /// Diagnostic context, such as the upstream's own error payload
    ///
    /// Only rendered when running in a development environment.
    fn details(&self) -> Option<String> {
        None
    }
}
