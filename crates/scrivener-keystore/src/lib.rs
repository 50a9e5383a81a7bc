#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

//! Credential and merge-prompt storage
//!
//! Both values live in small JSON files that an operator rewrites at
//! runtime through the admin endpoints. Every pipeline invocation reads
//! them afresh; writes go through a single writer and replace the file
//! atomically so readers never see a half-written value.

mod admin;
mod error;
mod value_file;

use std::sync::Arc;

use scrivener_config::StorageConfig;
use secrecy::SecretString;

pub use admin::endpoint_router;
pub use error::{Result, StoreError};
pub use value_file::ValueFile;

/// The credential and prompt stores used by the pipeline
#[derive(Debug)]
pub struct KeyStore {
    credential: ValueFile,
    prompt: ValueFile,
}

impl KeyStore {
    pub fn new(credential: ValueFile, prompt: ValueFile) -> Self {
        Self { credential, prompt }
    }

    pub fn from_config(config: &StorageConfig) -> Arc<Self> {
        Arc::new(Self::new(
            ValueFile::new(&config.credential_file, "key"),
            ValueFile::new(&config.prompt_file, "prompt"),
        ))
    }

    /// Resolve the upstream API key
    pub async fn credential(&self) -> Result<SecretString> {
        self.credential.read().await.map(SecretString::from)
    }

    /// Resolve the merge-rule prompt
    pub async fn prompt(&self) -> Result<String> {
        self.prompt.read().await
    }

    pub async fn set_credential(&self, key: &str) -> Result<()> {
        self.credential.write(key).await
    }

    pub async fn remove_credential(&self) -> Result<()> {
        self.credential.remove().await
    }

    pub async fn set_prompt(&self, prompt: &str) -> Result<()> {
        self.prompt.write(prompt).await
    }

    pub async fn remove_prompt(&self) -> Result<()> {
        self.prompt.remove().await
    }
}
