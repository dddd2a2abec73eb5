//! Anthropic Messages adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BackendProfile;
use crate::llm::{build_http_client, join_url, send_checked, BackendError, LlmBackend};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first text block; other block kinds are skipped.
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text)
            .unwrap_or_default()
    }
}

pub struct AnthropicBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicBackend {
    pub fn new(profile: &BackendProfile) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_http_client(profile)?,
            endpoint: join_url(&profile.base_url, "v1/messages"),
            model: profile.model_name.clone(),
            api_key: profile.api_key.clone(),
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
        })
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        let request_body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let request = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body);

        let response = send_checked(request).await?;
        let messages: MessagesResponse = response.json().await?;

        debug!("{} reply received from {}", self.name(), self.endpoint);
        Ok(messages.into_text())
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
