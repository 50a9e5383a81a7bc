#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

//! Template merge engine
//!
//! Combines a dictated transcript with a template fragment through an
//! external chat-completion model, then enforces the substitution rules
//! locally so the merged text never depends on the model following them.

mod client;
mod engine;
mod error;
mod protocol;
pub mod rules;
mod types;

use std::sync::Arc;

use scrivener_keystore::KeyStore;

pub use client::{CompletionClient, CompletionError, OpenAiCompletionClient};
pub use engine::MergeEngine;
pub use error::{MergeError, MergeFailure};
pub use protocol::{ChatMessage, Role};
pub use types::{MergeOutcome, MergeRequest, MergeResult};

/// Build the merge engine from configuration
pub fn build_engine(config: &scrivener_config::Config, keystore: Arc<KeyStore>) -> Arc<MergeEngine> {
    tracing::debug!(
        model = %config.completion.model,
        base_url = %config.completion.base_url,
        "initializing merge engine"
    );

    let client = OpenAiCompletionClient::new(&config.completion);
    Arc::new(MergeEngine::new(Arc::new(client), keystore))
}
