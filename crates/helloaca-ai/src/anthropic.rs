//! HTTP client for the Anthropic Messages API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use helloaca_config::{HelloAcaConfig, ProviderConfig};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Completion, ContractAnalyzer, ProviderError, RetryPolicy, TextGenerator};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Text-generation client for Claude.
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl AnthropicClient {
    /// Create a client from provider settings.
    ///
    /// A missing API key is not an error here; every call then fails with
    /// [`ProviderError::MissingCredential`] before touching the network.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Result<Completion, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredential);
        }

        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: 0.0,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        info!(model = %self.model, prompt_len = prompt.len(), "requesting contract analysis");
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, body, retry_after_secs));
        }

        let parsed: MessagesResponse = resp.json().await.map_err(body_error)?;

        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect();
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }

        let tokens_used = parsed
            .usage
            .map(|u| u.input_tokens + u.output_tokens)
            .unwrap_or(0);
        debug!(response_len = text.len(), tokens_used, "completion received");
        Ok(Completion { text, tokens_used })
    }
}

impl ContractAnalyzer {
    /// Analyzer backed by [`AnthropicClient`], with retry and validation mode from config.
    pub fn from_config(config: &HelloAcaConfig) -> Result<Self, ProviderError> {
        let client = AnthropicClient::new(&config.provider)?;
        Ok(Self::new(Arc::new(client))
            .with_retry(RetryPolicy::from_config(&config.provider))
            .with_strict_validation(config.analysis.strict_validation))
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(err.to_string())
    }
}

/// The client timeout also covers the body read, so a stalled body is a timeout.
fn body_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Decode(err.to_string())
    }
}

fn classify_status(status: StatusCode, body: String, retry_after_secs: Option<u64>) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized {
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited { retry_after_secs },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderError::Timeout,
        _ => ProviderError::Api {
            status: status.as_u16(),
            body,
        },
    }
}
