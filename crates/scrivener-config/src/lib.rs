#![allow(clippy::must_use_candidate)]

pub mod completion;
pub mod cors;
mod duration;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod storage;
pub mod telemetry;
pub mod transcription;

use serde::Deserialize;

pub use completion::*;
pub use cors::*;
pub use health::*;
pub use server::*;
pub use storage::*;
pub use telemetry::*;
pub use transcription::*;

/// Top-level Scrivener configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Speech-to-text upstream
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    /// Text-completion upstream used for template merges
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Credential, prompt and upload locations
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging and OTLP export
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
