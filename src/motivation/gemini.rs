/// Gemini `generateContent` client
///
/// Request building and response parsing are plain functions over serde
/// types; `GeminiClient` only adds the HTTP round trip.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::motivation::{MotivationError, TextGenerator};

/// Default model endpoint
pub const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent";

/// Instruction sent with every request
pub const SYSTEM_PROMPT: &str = "You are a positive and insightful personal coach for habit building. \
Your goal is to provide a single, concise, and highly motivating tip or quote (maximum two sentences) \
based on the user's current habits. Focus on the value of consistency and overcoming daily resistance. \
Do not include titles or prefixes like 'Tip: ' or 'Quote: '.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Body of a `generateContent` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
}

/// The user message for a comma separated habit list
pub fn user_query(task_list: &str) -> String {
    if task_list.trim().is_empty() {
        "Generate a general tip about starting a new habit and the power of small steps.".to_string()
    } else {
        format!("Generate a daily motivational tip or quote for the following habits: {}", task_list)
    }
}

/// Build the request body for a habit list
pub fn build_request(task_list: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content { parts: vec![Part { text: user_query(task_list) }] }],
        system_instruction: Content { parts: vec![Part { text: SYSTEM_PROMPT.to_string() }] },
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body
///
/// Returns None when any level is missing or the text is empty.
pub fn parse_response(body: &Value) -> Option<String> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Settings for the Gemini endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeminiConfig {
    pub api_url: String,
    /// Sent as the `key` query parameter when present
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: GEMINI_API_URL.to_string(),
            api_key: None,
        }
    }
}

/// HTTP client for the Gemini API
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, task_list: &str) -> Result<String, MotivationError> {
        let mut request = self.client.post(&self.config.api_url).json(&build_request(task_list));
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MotivationError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        debug!("Received generateContent response");
        parse_response(&body).ok_or(MotivationError::MissingText)
    }
}
