//! OpenAI-compatible chat completions client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use unimatch_config::LlmSettings;
use unimatch_core::UnimatchError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

/// Client for any endpoint speaking the OpenAI chat completions API.
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, UnimatchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UnimatchError::LlmError(e.to_string()))?;

        info!(
            "ChatClient: model={}, base_url={}, api_key_len={}",
            settings.model,
            settings.base_url,
            settings.api_key.len()
        );

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a system and user prompt, asking for a JSON object reply.
    pub async fn chat_json(&self, system_prompt: &str, user_input: &str) -> Result<String, UnimatchError> {
        let start = std::time::Instant::now();

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_input,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| UnimatchError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UnimatchError::LlmError(format!(
                "chat API error {}: {}",
                status, body
            )));
        }

        let resp: ChatResponse = response
            .json()
            .await
            .map_err(|e| UnimatchError::LlmError(e.to_string()))?;

        if let Some(usage) = &resp.usage {
            debug!(
                input_tokens = usage.prompt_tokens.unwrap_or(0),
                output_tokens = usage.completion_tokens.unwrap_or(0),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Chat completion finished"
            );
        }

        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| UnimatchError::LlmError("empty completion".into()))
    }
}
