use std::path::PathBuf;

use url::Url;

use crate::intake::StagedAudio;

/// Directory of kept recordings and the public URL it is served under
#[derive(Debug, Clone)]
pub(crate) struct Recordings {
    dir: PathBuf,
    base_url: Url,
}

impl Recordings {
    /// Recordings are served from `<public_url>/uploads/`
    pub fn new(dir: PathBuf, public_url: &Url) -> Self {
        let mut base_url = public_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Self { dir, base_url }
    }

    /// Move a staged upload into the recordings directory and return its URL
    pub async fn keep(&self, audio: StagedAudio) -> std::io::Result<Url> {
        let name = match audio.extension() {
            Some(ext) => format!("audio-{}.{ext}", uuid::Uuid::new_v4()),
            None => format!("audio-{}", uuid::Uuid::new_v4()),
        };
        let dir = self.dir.clone();
        let target = dir.join(&name);
        let file = audio.into_file();

        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir)?;

            // Rename fails across filesystems; fall back to a copy and let
            // the staged file be removed on drop
            if let Err(e) = file.persist(&target) {
                std::fs::copy(e.file.path(), &target)?;
            }

            Ok::<_, std::io::Error>(())
        })
        .await
        .map_err(std::io::Error::other)??;

        self.base_url
            .join(&format!("uploads/{name}"))
            .map_err(std::io::Error::other)
    }
}
