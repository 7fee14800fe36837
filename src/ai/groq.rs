//! Groq API client for code completions
//!
//! Talks to Groq's OpenAI-compatible chat completions endpoint. One request
//! carries a single user message; the first non-empty choice is the
//! completion. Absent or empty choices are treated as failure.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Groq API configuration
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 1024,
            temperature: 0.3,
            timeout_ms: 10000,
        }
    }
}

/// Groq API client
#[derive(Debug)]
pub struct GroqClient {
    config: GroqConfig,
    http_client: reqwest::Client,
}

/// Chat completions request structure
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat completions response structure
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl GroqClient {
    /// Create a new Groq API client
    pub fn new(config: GroqConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(anyhow::anyhow!(
                "Groq API key is required. Set GROQ_API_KEY environment variable or configure via CLI."
            ));
        }

        url::Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid Groq endpoint: {}", config.endpoint))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    format!("Bearer {}", config.api_key)
                        .parse()
                        .context("Invalid API key format")?,
                );
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    "application/json".parse().context("Invalid content type")?,
                );
                headers
            })
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { config, http_client })
    }

    /// Send `prompt` as a single user message and return the model's reply
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Groq API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Groq API returned error status {}: {}",
                status,
                error_body
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Groq API response")?;

        let text = chat_response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("Groq API returned no choices"))?;

        if text.is_empty() {
            return Err(anyhow::anyhow!("Groq API returned an empty completion"));
        }

        Ok(text)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}
