//! Test server wrapper that starts Scrivener on a random port

use std::{net::SocketAddr, path::Path};

use scrivener_server::Server;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::config::TestConfig;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
    storage: TempDir,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start(test_config: TestConfig) -> anyhow::Result<Self> {
        let TestConfig { config, storage } = test_config;

        let server = Server::new(&config)?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self {
            addr,
            shutdown,
            client,
            storage,
        })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Server address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Root of the temp directory holding the server's storage
    pub fn storage(&self) -> &Path {
        self.storage.path()
    }

    /// Files currently staged for in-flight uploads
    pub fn staged_uploads(&self) -> usize {
        std::fs::read_dir(self.storage().join("uploads/.staging")).map_or(0, Iterator::count)
    }

    /// POST a multipart form
    pub async fn upload(&self, path: &str, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("request sent")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// A form carrying `audio` as a small WAV-named file
pub fn audio_form(filename: &str, mime: &str, data: &[u8]) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(data.to_vec())
        .file_name(filename.to_owned())
        .mime_str(mime)
        .expect("valid MIME");

    reqwest::multipart::Form::new().part("audio", part)
}

pub fn wav_form(data: &[u8]) -> reqwest::multipart::Form {
    audio_form("dictation.wav", "audio/wav", data)
}
