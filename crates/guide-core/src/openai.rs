//! Minimal client for OpenAI-compatible chat completion endpoints.
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RerankError;

const USER_AGENT: &str = "guide-search/rerank";
const MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new() -> Result<Self, RerankError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(RerankError::ClientInit)?;
        Ok(Self { http })
    }

    /// POST one chat completion and return `choices[0].message.content`.
    ///
    /// Single attempt; no retries. Deadlines are the caller's concern.
    pub async fn complete(
        &self,
        endpoint: &str,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<String, RerankError> {
        let resp = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, MAX_ERROR_BODY_BYTES).await;
            return Err(RerankError::UnexpectedStatus { status, body });
        }

        let body = resp.text().await?;
        debug!(bytes = body.len(), "chat completion received");
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| RerankError::Parse(format!("invalid response JSON: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RerankError::Parse("missing choices[0].message.content".to_string()))
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(b) => {
            let end = b.len().min(max_bytes);
            String::from_utf8_lossy(&b[..end]).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}
