//! Multipart intake for audio uploads
//!
//! The audio part is streamed straight into a temp file under the staging
//! directory; the file is removed when the [`StagedAudio`] is dropped.

use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::extract::{FromRequest, Multipart, Request, multipart::Field};
use scrivener_core::Failure;
use stt::AudioPayload;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::{Pipeline, error::IntakeError};

/// Multipart field holding the recording
const AUDIO_FIELD: &str = "audio";

/// Upper bound for the text fields sent alongside the audio
const TEXT_FIELD_LIMIT: u64 = 1 << 20;

/// Size bound for `/audio-update` uploads
pub const TEMPLATE_UPLOAD_LIMIT: u64 = 10 << 20;

const ACCEPTED_MIME_TYPES: &[&str] = &["audio/wav", "audio/wave", "audio/x-wav", "audio/webm"];
const ACCEPTED_EXTENSIONS: &[&str] = &["wav", "webm"];

#[derive(Debug, Clone)]
pub(crate) struct IntakeSettings {
    pub staging_dir: PathBuf,
    /// Bound for `/asr` uploads
    pub asr_limit: u64,
}

/// Per-route upload rules
pub(crate) trait UploadRoute: Send + Sync + 'static {
    /// Text field carried alongside the audio
    const TEXT_FIELD: &'static str;

    /// Whether only WAV and WebM recordings are accepted
    const RESTRICT_TYPES: bool;

    fn size_limit(settings: &IntakeSettings) -> u64;
}

pub(crate) struct Asr;

impl UploadRoute for Asr {
    const TEXT_FIELD: &'static str = "selectedText";
    const RESTRICT_TYPES: bool = true;

    fn size_limit(settings: &IntakeSettings) -> u64 {
        settings.asr_limit
    }
}

pub(crate) struct AudioUpdate;

impl UploadRoute for AudioUpdate {
    const TEXT_FIELD: &'static str = "templateText";
    const RESTRICT_TYPES: bool = false;

    fn size_limit(_settings: &IntakeSettings) -> u64 {
        TEMPLATE_UPLOAD_LIMIT
    }
}

/// An accepted upload
#[derive(Debug)]
pub(crate) struct Upload {
    pub audio: StagedAudio,
    pub text: Option<String>,
}

/// Audio staged on disk for the lifetime of the request
#[derive(Debug)]
pub(crate) struct StagedAudio {
    file: NamedTempFile,
    size: u64,
    filename: String,
    content_type: String,
}

impl StagedAudio {
    pub fn payload(&self) -> AudioPayload {
        AudioPayload::from_file(self.file.path(), self.size, &self.filename, &self.content_type)
    }

    pub const fn size(&self) -> u64 {
        self.size
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Lowercased extension of the client's filename
    pub fn extension(&self) -> Option<String> {
        extension(&self.filename)
    }

    pub fn into_file(self) -> NamedTempFile {
        self.file
    }
}

/// Extractor for an audio upload following the rules of `R`
pub(crate) struct ExtractUpload<R>(pub Upload, pub PhantomData<R>);

impl<R: UploadRoute> FromRequest<Arc<Pipeline>> for ExtractUpload<R> {
    type Rejection = Failure;

    async fn from_request(request: Request, pipeline: &Arc<Pipeline>) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(request, pipeline)
            .await
            .map_err(|e| pipeline.diagnostics.fail(&IntakeError::NotMultipart(e.body_text())))?;

        match receive::<R>(multipart, &pipeline.intake).await {
            Ok(upload) => Ok(Self(upload, PhantomData)),
            Err(e) => {
                tracing::debug!(error = %e, "rejected upload");
                Err(pipeline.diagnostics.fail(&e))
            }
        }
    }
}

async fn receive<R: UploadRoute>(mut multipart: Multipart, settings: &IntakeSettings) -> Result<Upload, IntakeError> {
    let mut audio: Option<StagedAudio> = None;
    let mut text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IntakeError::Malformed(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == AUDIO_FIELD {
            if audio.is_some() {
                return Err(IntakeError::Malformed("more than one audio file".to_string()));
            }
            audio = Some(stage::<R>(field, &settings.staging_dir, R::size_limit(settings)).await?);
        } else if name == R::TEXT_FIELD {
            text = Some(read_text(field, &name).await?);
        }
    }

    let audio = audio.ok_or(IntakeError::MissingAudio)?;

    tracing::debug!(
        filename = %audio.filename,
        size = audio.size,
        text_chars = text.as_ref().map_or(0, String::len),
        "upload staged"
    );

    Ok(Upload { audio, text })
}

async fn stage<R: UploadRoute>(mut field: Field<'_>, dir: &Path, limit: u64) -> Result<StagedAudio, IntakeError> {
    let filename = field.file_name().unwrap_or(AUDIO_FIELD).to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    if R::RESTRICT_TYPES && !is_accepted(&filename, &content_type) {
        return Err(IntakeError::UnsupportedType { filename, content_type });
    }

    tokio::fs::create_dir_all(dir).await.map_err(IntakeError::Staging)?;

    let file = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(dir)
        .map_err(IntakeError::Staging)?;
    let mut writer = tokio::fs::File::from_std(file.reopen().map_err(IntakeError::Staging)?);

    let mut size = 0u64;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| IntakeError::Malformed(e.body_text()))?
    {
        size += chunk.len() as u64;
        if size > limit {
            return Err(IntakeError::TooLarge { limit });
        }
        writer.write_all(&chunk).await.map_err(IntakeError::Staging)?;
    }
    writer.flush().await.map_err(IntakeError::Staging)?;

    Ok(StagedAudio {
        file,
        size,
        filename,
        content_type,
    })
}

async fn read_text(mut field: Field<'_>, name: &str) -> Result<String, IntakeError> {
    let mut buffer = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| IntakeError::Malformed(e.body_text()))?
    {
        if (buffer.len() + chunk.len()) as u64 > TEXT_FIELD_LIMIT {
            return Err(IntakeError::FieldTooLarge {
                field: name.to_string(),
                limit: TEXT_FIELD_LIMIT,
            });
        }
        buffer.extend_from_slice(&chunk);
    }

    String::from_utf8(buffer).map_err(|_| IntakeError::Malformed(format!("field '{name}' is not valid UTF-8")))
}

/// WAV or WebM by both extension and declared MIME type
fn is_accepted(filename: &str, content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

    ACCEPTED_MIME_TYPES.contains(&essence.as_str())
        && extension(filename).is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_wav_and_webm() {
        assert!(is_accepted("note.wav", "audio/wav"));
        assert!(is_accepted("NOTE.WAV", "audio/x-wav"));
        assert!(is_accepted("clip.webm", "audio/webm; codecs=opus"));
        assert!(is_accepted("clip.wav", "audio/wave"));
    }

    #[test]
    fn requires_both_extension_and_mime() {
        assert!(!is_accepted("note.mp3", "audio/wav"));
        assert!(!is_accepted("note.wav", "audio/mpeg"));
        assert!(!is_accepted("note", "audio/wav"));
        assert!(!is_accepted("note.wav.exe", "audio/wav"));
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension("Recording.WebM").as_deref(), Some("webm"));
        assert_eq!(extension("recording"), None);
    }
}
