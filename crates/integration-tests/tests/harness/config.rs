//! Programmatic configuration builder for integration tests

use std::{net::SocketAddr, path::Path, time::Duration};

use scrivener_config::{Config, CorsConfig, Environment};
use tempfile::TempDir;

pub const TEST_KEY: &str = "sk-test-1234567890abcd";
pub const TEST_PROMPT: &str = "Keep the cause title unchanged.";

/// Configuration plus the scratch directory its storage paths point into
pub struct TestConfig {
    pub config: Config,
    pub storage: TempDir,
}

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
    storage: TempDir,
    credential: Option<String>,
    prompt: Option<String>,
}

impl ConfigBuilder {
    /// Minimal configuration with all storage in a fresh temp directory
    ///
    /// Neither a credential nor a prompt is stored.
    pub fn new() -> Self {
        let storage = tempfile::tempdir().expect("temp dir");

        let mut config = Config::default();
        config.server.listen_address = SocketAddr::from(([127, 0, 0, 1], 0));
        config.storage.credential_file = storage.path().join("data/updatekey.json");
        config.storage.prompt_file = storage.path().join("data/updateprompt.json");
        config.storage.uploads_dir = storage.path().join("uploads/.staging");

        Self {
            config,
            storage,
            credential: None,
            prompt: None,
        }
    }

    /// Point both adapters at a mock upstream
    pub fn with_upstream(mut self, base_url: &str) -> Self {
        self.config.transcription.base_url = base_url.parse().expect("valid URL");
        self.config.completion.base_url = self.config.transcription.base_url.clone();
        self
    }

    /// Store the default test credential and prompt
    pub fn with_keys(self) -> Self {
        self.with_credential(TEST_KEY).with_prompt(TEST_PROMPT)
    }

    pub fn with_credential(mut self, key: &str) -> Self {
        self.credential = Some(key.to_owned());
        self
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = Some(prompt.to_owned());
        self
    }

    /// Keep processed recordings and serve them under `/uploads`
    pub fn with_recordings(mut self) -> Self {
        self.config.storage.recordings_dir = Some(self.storage.path().join("recordings"));
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.config.server.path_prefix = prefix.to_owned();
        self
    }

    pub fn with_max_upload_size(mut self, bytes: u64) -> Self {
        self.config.transcription.max_upload_size = bytes;
        self
    }

    /// Bound both upstream calls
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.config.transcription.timeout = timeout;
        self.config.completion.timeout = timeout;
        self
    }

    pub fn in_development(mut self) -> Self {
        self.config.server.environment = Environment::Development;
        self
    }

    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Write the stored values and build the final config
    pub fn build(self) -> TestConfig {
        if let Some(key) = &self.credential {
            write_value(&self.config.storage.credential_file, "key", key);
        }
        if let Some(prompt) = &self.prompt {
            write_value(&self.config.storage.prompt_file, "prompt", prompt);
        }

        TestConfig {
            config: self.config,
            storage: self.storage,
        }
    }
}

fn write_value(path: &Path, field: &str, value: &str) {
    std::fs::create_dir_all(path.parent().expect("parent dir")).expect("create data dir");
    std::fs::write(path, serde_json::json!({ field: value }).to_string()).expect("write value file");
}
