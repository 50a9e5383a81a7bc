use std::{sync::OnceLock, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use scrivener_config::CompletionConfig;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::protocol::{ChatMessage, ChatRequest, ChatResponse};

/// Transport-level failure of a completion call
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request timed out")]
    Timeout,
    #[error("provider returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("connection error: {0}")]
    Connection(String),
    #[error("failed to parse response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Connection(error.to_string())
        }
    }
}

/// A chat-completion backend
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the messages and return the first choice's content
    async fn complete(&self, api_key: &SecretString, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            Client::builder()
                .pool_idle_timeout(Some(Duration::from_secs(5)))
                .tcp_nodelay(true)
                .build()
                .expect("Failed to build default HTTP client")
        })
        .clone()
}

/// OpenAI-compatible `/chat/completions` client
pub struct OpenAiCompletionClient {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiCompletionClient {
    pub fn new(config: &CompletionConfig) -> Self {
        let base = config.base_url.as_str().trim_end_matches('/');

        Self {
            client: http_client(),
            endpoint: format!("{base}/chat/completions"),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, api_key: &SecretString, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %self.model, error = %e, "completion request failed");
                CompletionError::from_transport(&e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.model, status = %status, "completion upstream returned error");
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await.map_err(|e| CompletionError::from_transport(&e))?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        parsed
            .into_content()
            .ok_or_else(|| CompletionError::MalformedResponse("response has no choices".to_string()))
    }
}
