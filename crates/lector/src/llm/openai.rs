//! OpenAI-compatible chat-completions adapter. Also speaks for DeepSeek,
//! LM Studio, vLLM and anything else exposing `/chat/completions`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BackendProfile;
use crate::llm::{build_http_client, join_url, send_checked, BackendError, LlmBackend};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice; empty when the service returned no choices
    /// or a null content field.
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default()
    }
}

pub struct OpenAiBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiBackend {
    pub fn new(profile: &BackendProfile) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_http_client(profile)?,
            endpoint: join_url(&profile.base_url, "chat/completions"),
            model: profile.model_name.clone(),
            api_key: profile.api_key.clone(),
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
        })
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        // Local servers (LM Studio, vLLM without auth) take no key.
        let mut request = self.client.post(&self.endpoint).json(&request_body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = send_checked(request).await?;
        let chat: ChatResponse = response.json().await?;

        debug!("{} reply received from {}", self.name(), self.endpoint);
        Ok(chat.into_text())
    }

    fn name(&self) -> &'static str {
        "openai-compatible"
    }
}
