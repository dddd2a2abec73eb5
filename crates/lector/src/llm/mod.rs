//! LLM backends: the single boundary through which review prompts leave the
//! process.
//!
//! ARCHITECTURAL RULE: the checkers never talk to a provider directly. They
//! hold a `dyn LlmBackend` and call [`LlmBackend::invoke`]; everything
//! provider-specific (endpoints, auth headers, wire shapes) stays behind
//! [`create_backend`].

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::{BackendProfile, InterfaceFormat};

mod anthropic;
mod ollama;
mod openai;

pub use anthropic::AnthropicBackend;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One text-generation backend.
///
/// `invoke` sends a single prompt and returns the raw reply text. An `Ok`
/// empty string means the service answered but produced no usable text; the
/// checkers fold that into their no-reply verdict. Transport and API
/// failures are `Err` and propagate unchanged.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError>;

    /// Short label for diagnostics.
    fn name(&self) -> &'static str;
}

/// Builds the backend matching `profile.interface_format`.
///
/// Dispatch is a `match` over [`InterfaceFormat`], so every supported format
/// has an adapter by construction. Hosts needing an unsupported provider
/// implement [`LlmBackend`] themselves and call the `*_with` checker
/// variants.
pub fn create_backend(profile: &BackendProfile) -> Result<Box<dyn LlmBackend>, BackendError> {
    let backend: Box<dyn LlmBackend> = match profile.interface_format {
        InterfaceFormat::OpenAi => Box::new(OpenAiBackend::new(profile)?),
        InterfaceFormat::Ollama => Box::new(OllamaBackend::new(profile)?),
        InterfaceFormat::Anthropic => Box::new(AnthropicBackend::new(profile)?),
    };
    debug!(
        "created {} backend for model '{}'",
        backend.name(),
        profile.model_name
    );
    Ok(backend)
}

// ────────────────────────────────────────────────────────────────────────────
// Shared HTTP plumbing for the adapters
// ────────────────────────────────────────────────────────────────────────────

/// Builds the adapter's HTTP client. The profile's timeout is enforced here;
/// no other timeout logic exists in the crate.
pub(crate) fn build_http_client(profile: &BackendProfile) -> Result<reqwest::Client, BackendError> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(profile.timeout_secs))
        .build()?)
}

/// Joins a service root and an endpoint path, tolerating a trailing slash on
/// the root.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Sends the request and maps any non-success status to
/// [`BackendError::Api`], pulling a readable message out of the provider's
/// error body where possible.
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, BackendError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Api {
            status: status.as_u16(),
            message: error_message(body),
        });
    }

    Ok(response)
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// OpenAI and Anthropic wrap errors as `{"error": {"message": ...}}`; Ollama
/// uses `{"error": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed { message: String },
    Plain(String),
}

fn error_message(body: String) -> String {
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => match envelope.error {
            ErrorBody::Detailed { message } => message,
            ErrorBody::Plain(message) => message,
        },
        Err(_) => body,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scripted backends for tests
// ────────────────────────────────────────────────────────────────────────────
