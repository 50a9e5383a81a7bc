use std::path::PathBuf;

use serde::Deserialize;

/// Locations of the credential and prompt files and of uploaded audio
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON file holding the upstream API key (`{"key": "..."}`)
    #[serde(default = "default_credential_file")]
    pub credential_file: PathBuf,
    /// JSON file holding the merge-rule prompt (`{"prompt": "..."}`)
    #[serde(default = "default_prompt_file")]
    pub prompt_file: PathBuf,
    /// Directory for staged uploads; files never outlive their request
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    /// Archive directory for processed recordings, served under `/uploads`
    #[serde(default)]
    pub recordings_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            credential_file: default_credential_file(),
            prompt_file: default_prompt_file(),
            uploads_dir: default_uploads_dir(),
            recordings_dir: None,
        }
    }
}

fn default_credential_file() -> PathBuf {
    PathBuf::from("data/updatekey.json")
}

fn default_prompt_file() -> PathBuf {
    PathBuf::from("data/updateprompt.json")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads/.staging")
}
