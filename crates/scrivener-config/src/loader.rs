use std::path::Path;

use crate::{Config, transcription::TRANSCRIPTION_SIZE_LIMIT};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, expansion or parsing
    /// fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_upstreams()?;
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let prefix = &self.server.path_prefix;

        if !prefix.is_empty() && !prefix.starts_with('/') {
            anyhow::bail!("server.path_prefix must start with '/': `{prefix}`");
        }

        if !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        Ok(())
    }

    fn validate_upstreams(&self) -> anyhow::Result<()> {
        if self.transcription.timeout.is_zero() {
            anyhow::bail!("transcription.timeout must be greater than 0");
        }

        if self.completion.timeout.is_zero() {
            anyhow::bail!("completion.timeout must be greater than 0");
        }

        let max = self.transcription.max_upload_size;
        if max == 0 || max > TRANSCRIPTION_SIZE_LIMIT {
            anyhow::bail!("transcription.max_upload_size must be between 1 and {TRANSCRIPTION_SIZE_LIMIT} bytes");
        }

        if !(0.0..=2.0).contains(&self.completion.temperature) {
            anyhow::bail!("completion.temperature must be between 0 and 2");
        }

        Ok(())
    }
}
