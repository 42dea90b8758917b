//! x.ai chat completions client.
//!
//! Single-shot queries against the Grok model. The system prompt pins the
//! response to an HTML fragment so it can drop straight into the email
//! body.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";
const DEFAULT_MODEL: &str = "grok-3-beta";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that provides accurate, \
    well-researched info. Respond using a html div section, not a complete html";

/// Hosted-model client for x.ai's OpenAI-compatible API.
pub struct XaiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

impl Default for XaiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl XaiClient {
    /// Create a client against the production x.ai endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (used by tests).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Ask the model a question and return its answer.
    pub async fn complete(&self, api_key: &str, query: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": query },
            ],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to reach x.ai API")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("x.ai API error ({status}): {text}");
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse x.ai response")?;

        let answer = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        tracing::debug!("AI response received ({} chars)", answer.len());

        Ok(answer)
    }
}
