//! OpenAI-Compatible Provider
//!
//! Implementation of the LlmProvider trait for the OpenAI chat-completions
//! API. The same wire format is served by Ollama's `/v1` endpoint, so local
//! models go through this provider too.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::provider::{missing_api_key_error, parse_http_error, LlmProvider};
use super::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig, ProviderType,
    UsageStats,
};
use crate::http_client::build_http_client;

/// OpenAI-compatible provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.proxy.as_deref(), config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Models listing endpoint derived from the completions endpoint
    fn models_url(&self) -> String {
        let endpoint = self.config.endpoint();
        match endpoint.strip_suffix("/chat/completions") {
            Some(base) => format!("{}/models", base),
            None => endpoint.to_string(),
        }
    }

    /// Bearer token for the request, if one is needed
    fn api_key(&self) -> LlmResult<Option<&str>> {
        match (&self.config.api_key, self.config.provider.requires_api_key()) {
            (Some(key), _) => Ok(Some(key.as_str())),
            (None, true) => Err(missing_api_key_error(self.name())),
            (None, false) => Ok(None),
        }
    }

    /// Build the request body for the API
    fn build_request_body(
        &self,
        messages: &[Message],
        system: Option<&str>,
        request_options: &LlmRequestOptions,
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": request_options
                .max_tokens_override
                .unwrap_or(self.config.max_tokens),
            "temperature": request_options
                .temperature_override
                .unwrap_or(self.config.temperature),
            "stream": false,
        });

        if let Some(top_p) = request_options.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }
        // top_k is not part of the OpenAI schema; Ollama accepts it.
        if let (Some(top_k), ProviderType::Ollama) = (request_options.top_k, self.config.provider) {
            body["top_k"] = serde_json::json!(top_k);
        }

        let mut wire_messages: Vec<serde_json::Value> = Vec::new();
        if let Some(sys) = system {
            wire_messages.push(serde_json::json!({
                "role": "system",
                "content": sys
            }));
        }
        for msg in messages {
            wire_messages.push(serde_json::json!({
                "role": msg.role,
                "content": msg.content
            }));
        }
        body["messages"] = serde_json::json!(wire_messages);

        body
    }

    /// Parse a response from the API
    fn parse_response(&self, response: OpenAIResponse) -> LlmResponse {
        let choice = response.choices.into_iter().next();
        let (content, finish_reason) = match choice {
            Some(choice) => (
                choice.message.and_then(|m| m.content),
                choice.finish_reason,
            ),
            None => (None, None),
        };

        let usage = response
            .usage
            .map(|u| UsageStats {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        LlmResponse {
            content,
            finish_reason,
            usage,
            model: response.model.unwrap_or_else(|| self.config.model.clone()),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        match self.config.provider {
            ProviderType::OpenAI => "openai",
            ProviderType::Ollama => "ollama",
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn context_window(&self) -> u32 {
        let model = self.config.model.to_lowercase();
        if model.contains("gpt-4o") || model.contains("gpt-4.1") || model.contains("gpt-4-turbo")
        {
            128_000
        } else if model.contains("gpt-3.5") {
            16_384
        } else if self.config.provider == ProviderType::Ollama {
            8_192
        } else {
            128_000
        }
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let api_key = self.api_key()?;
        let body = self.build_request_body(&messages, system.as_deref(), &request_options);

        debug!(
            provider = self.name(),
            model = %self.config.model,
            "Sending chat completion request"
        );

        let mut request = self
            .client
            .post(self.config.endpoint())
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                LlmError::ProviderUnavailable {
                    message: e.to_string(),
                }
            } else {
                LlmError::NetworkError {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if status != 200 {
            return Err(parse_http_error(status, &body_text, self.name()));
        }

        let parsed: OpenAIResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        Ok(self.parse_response(parsed))
    }

    async fn health_check(&self) -> LlmResult<()> {
        let api_key = self.api_key()?;

        let mut request = self.client.get(self.models_url());
        if let Some(key) = api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| LlmError::ProviderUnavailable {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        if status == 200 {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(parse_http_error(status, &body, self.name()))
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Chat-completions response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
