use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::Serialize;

/// Where the audio bytes live
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Already buffered in memory
    Memory(Bytes),
    /// Staged on disk, streamed to the upstream
    File(PathBuf),
}

/// Audio plus the metadata the upstream needs
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub source: AudioSource,
    /// Declared size in bytes
    pub size: u64,
    /// Original filename; the upstream infers the container from it
    pub filename: String,
    /// Declared MIME type
    pub content_type: String,
}

impl AudioPayload {
    pub fn from_bytes(bytes: impl Into<Bytes>, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        let bytes = bytes.into();
        Self {
            size: bytes.len() as u64,
            source: AudioSource::Memory(bytes),
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    pub fn from_file(
        path: impl AsRef<Path>,
        size: u64,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            source: AudioSource::File(path.as_ref().to_path_buf()),
            size,
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }
}

/// A single transcription call
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub audio: AudioPayload,
    /// Language hint (ISO 639-1); the backend default applies when `None`
    pub language: Option<String>,
}

impl TranscriptionRequest {
    pub fn new(audio: AudioPayload) -> Self {
        Self { audio, language: None }
    }
}

/// Plain text returned by the upstream
///
/// An empty transcript is a valid result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
