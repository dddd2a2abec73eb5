//! Native Ollama adapter (`/api/generate`, non-streaming).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BackendProfile;
use crate::llm::{build_http_client, join_url, send_checked, BackendError, LlmBackend};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Ollama calls its reply budget `num_predict` rather than `max_tokens`.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

pub struct OllamaBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaBackend {
    pub fn new(profile: &BackendProfile) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_http_client(profile)?,
            endpoint: join_url(&profile.base_url, "api/generate"),
            model: profile.model_name.clone(),
            api_key: profile.api_key.clone(),
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
        })
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        // Plain local Ollama has no auth; deployments behind a proxy may.
        let mut request = self.client.post(&self.endpoint).json(&request_body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = send_checked(request).await?;
        let generated: GenerateResponse = response.json().await?;

        debug!("{} reply received from {}", self.name(), self.endpoint);
        Ok(generated.response)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_wire_shape() {
        let body = GenerateRequest {
            model: "qwen2.5:14b",
            prompt: "请检查",
            stream: false,
            options: GenerateOptions {
                temperature: 0.5,
                num_predict: 2048,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "qwen2.5:14b",
                "prompt": "请检查",
                "stream": false,
                "options": {"temperature": 0.5, "num_predict": 2048}
            })
        );
    }

    #[test]
    fn test_reply_text_from_response_field() {
        let raw = r#"{"model": "qwen2.5:14b", "response": "【一致性检查】\n符合目录规划。", "done": true}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.response, "【一致性检查】\n符合目录规划。");
    }

    #[test]
    fn test_missing_response_field_is_empty_reply() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert_eq!(parsed.response, "");
    }

    #[test]
    fn test_endpoint_joins_api_generate() {
        let profile = BackendProfile {
            base_url: "http://localhost:11434".to_string(),
            ..BackendProfile::default()
        };
        let backend = OllamaBackend::new(&profile).unwrap();
        assert_eq!(backend.endpoint, "http://localhost:11434/api/generate");
    }
}
