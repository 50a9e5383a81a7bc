//! Mock OpenAI-compatible upstream for integration tests
//!
//! Serves `/v1/audio/transcriptions` and `/v1/chat/completions` with canned
//! replies and counts every call it receives.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing,
};
use tokio_util::sync::CancellationToken;

/// How an endpoint answers
#[derive(Debug, Clone)]
pub enum Reply {
    /// Success carrying this text (transcript or completion content)
    Text(String),
    /// Error status with an upstream-style error body
    Status(StatusCode, String),
    /// Sleep before answering successfully
    Slow(Duration, String),
}

impl Reply {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// A multipart upload as seen by the transcription endpoint
#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub fields: Vec<(String, String)>,
    pub file_name: Option<String>,
    pub file_size: usize,
}

struct MockState {
    transcription: Reply,
    completion: Reply,
    transcription_count: AtomicU32,
    completion_count: AtomicU32,
    last_authorization: Mutex<Option<String>>,
    last_upload: Mutex<Option<ReceivedUpload>>,
    last_chat_request: Mutex<Option<serde_json::Value>>,
}

/// Mock upstream that returns predictable responses
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockUpstream {
    /// Transcribes every upload to `oblique case` and merges to a quoted
    /// `Hon. Court, oblique case`
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Reply::text("oblique case"), Reply::text("\"Hon. Court, oblique case\"")).await
    }

    pub async fn start_with(transcription: Reply, completion: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            transcription,
            completion,
            transcription_count: AtomicU32::new(0),
            completion_count: AtomicU32::new(0),
            last_authorization: Mutex::new(None),
            last_upload: Mutex::new(None),
            last_chat_request: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/audio/transcriptions", routing::post(handle_transcription))
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL including `/v1`, as the adapters append the endpoint path
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn transcription_count(&self) -> u32 {
        self.state.transcription_count.load(Ordering::Relaxed)
    }

    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }

    pub fn last_upload(&self) -> Option<ReceivedUpload> {
        self.state.last_upload.lock().unwrap().clone()
    }

    pub fn last_chat_request(&self) -> Option<serde_json::Value> {
        self.state.last_chat_request.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn record_authorization(state: &MockState, headers: &HeaderMap) {
    let authorization = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    *state.last_authorization.lock().unwrap() = authorization;
}

async fn answer(reply: &Reply, success: impl FnOnce(&str) -> serde_json::Value) -> Response {
    match reply {
        Reply::Text(text) => Json(success(text)).into_response(),
        Reply::Status(status, message) => (
            *status,
            Json(serde_json::json!({"error": {"message": message, "type": "invalid_request_error"}})),
        )
            .into_response(),
        Reply::Slow(delay, text) => {
            tokio::time::sleep(*delay).await;
            Json(success(text)).into_response()
        }
    }
}

async fn handle_transcription(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    state.transcription_count.fetch_add(1, Ordering::Relaxed);
    record_authorization(&state, &headers);

    let mut upload = ReceivedUpload::default();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        if name == "file" {
            upload.file_name = field.file_name().map(str::to_owned);
            upload.file_size = field.bytes().await.map_or(0, |b| b.len());
        } else {
            let value = field.text().await.unwrap_or_default();
            upload.fields.push((name, value));
        }
    }
    *state.last_upload.lock().unwrap() = Some(upload);

    answer(&state.transcription, |text| serde_json::json!({"text": text})).await
}

async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(request): Json<serde_json::Value>,
) -> Response {
    state.completion_count.fetch_add(1, Ordering::Relaxed);
    record_authorization(&state, &headers);

    let model = request["model"].as_str().unwrap_or("mock").to_owned();
    *state.last_chat_request.lock().unwrap() = Some(request);

    answer(&state.completion, |content| {
        serde_json::json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    })
    .await
}
