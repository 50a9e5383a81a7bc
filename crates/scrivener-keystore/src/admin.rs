//! Admin endpoints for rotating the API key and the merge prompt

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::get,
};
use http::StatusCode;
use scrivener_core::{Diagnostics, Failure};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::KeyStore;

#[derive(Clone)]
struct AdminState {
    store: Arc<KeyStore>,
    diagnostics: Diagnostics,
}

/// Create the router for `/open-ai` and `/update-prompts`
pub fn endpoint_router(store: Arc<KeyStore>, diagnostics: Diagnostics) -> Router {
    Router::new()
        .route(
            "/open-ai",
            get(show_credential).post(save_credential).delete(remove_credential),
        )
        .route(
            "/update-prompts",
            get(show_prompt).post(save_prompt).delete(remove_prompt),
        )
        .with_state(AdminState { store, diagnostics })
}

#[derive(Debug, Deserialize)]
struct SaveCredential {
    #[serde(default)]
    input: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SavePrompt {
    #[serde(default)]
    prompts: Option<String>,
}

#[derive(Debug, Serialize)]
struct Ack {
    success: bool,
    message: &'static str,
}

impl Ack {
    const fn ok(message: &'static str) -> Json<Self> {
        Json(Self { success: true, message })
    }
}

#[derive(Debug, Serialize)]
struct CredentialStatus {
    success: bool,
    configured: bool,
    key: String,
}

#[derive(Debug, Serialize)]
struct PromptBody {
    success: bool,
    prompt: String,
}

async fn save_credential(
    State(state): State<AdminState>,
    body: Result<Json<SaveCredential>, JsonRejection>,
) -> Result<Json<Ack>, Failure> {
    let key = required(body.ok().and_then(|Json(b)| b.input), "Invalid OpenAI key.")?;

    state
        .store
        .set_credential(&key)
        .await
        .map_err(|e| state.diagnostics.fail(&e))?;

    Ok(Ack::ok("OpenAI key saved successfully."))
}

async fn show_credential(State(state): State<AdminState>) -> Result<Json<CredentialStatus>, Failure> {
    let key = state.store.credential().await.map_err(|e| state.diagnostics.fail(&e))?;

    Ok(Json(CredentialStatus {
        success: true,
        configured: true,
        key: mask(key.expose_secret()),
    }))
}

async fn remove_credential(State(state): State<AdminState>) -> Result<Json<Ack>, Failure> {
    state
        .store
        .remove_credential()
        .await
        .map_err(|e| state.diagnostics.fail(&e))?;

    Ok(Ack::ok("OpenAI key removed successfully."))
}

async fn save_prompt(
    State(state): State<AdminState>,
    body: Result<Json<SavePrompt>, JsonRejection>,
) -> Result<Json<Ack>, Failure> {
    let prompt = required(body.ok().and_then(|Json(b)| b.prompts), "Invalid prompt.")?;

    state
        .store
        .set_prompt(&prompt)
        .await
        .map_err(|e| state.diagnostics.fail(&e))?;

    Ok(Ack::ok("Prompt saved successfully."))
}

async fn show_prompt(State(state): State<AdminState>) -> Result<Json<PromptBody>, Failure> {
    let prompt = state.store.prompt().await.map_err(|e| state.diagnostics.fail(&e))?;

    Ok(Json(PromptBody { success: true, prompt }))
}

async fn remove_prompt(State(state): State<AdminState>) -> Result<Json<Ack>, Failure> {
    state
        .store
        .remove_prompt()
        .await
        .map_err(|e| state.diagnostics.fail(&e))?;

    Ok(Ack::ok("Prompt removed successfully."))
}

fn required(value: Option<String>, message: &str) -> Result<String, Failure> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Failure::new(StatusCode::BAD_REQUEST, "validation_error", message))
}

/// Keep just enough of a key to recognize it
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();

    if chars.len() <= 10 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
