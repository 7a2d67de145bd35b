//! LLM-assisted reordering of the top keyword candidates.
//!
//! The model sees only `{id, title, summary, tags}` for at most [`MAX_CANDIDATES`]
//! guides and answers with a JSON array of ids. Whatever it answers, the result is a
//! permutation of the candidate set: unknown ids are ignored, duplicates collapse, and
//! unmentioned candidates are appended in keyword order.
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use crate::error::RerankError;
use crate::model::{Guide, RerankConfig};
use crate::openai::{ChatClient, ChatCompletionRequest, Message};

/// Hard upper bound on one rerank round trip.
pub const RERANK_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_CANDIDATES: usize = 20;
/// How many ids the model is asked to return.
pub const MAX_MODEL_IDS: usize = 10;

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 500;

#[derive(Clone)]
pub struct RerankClient {
    chat: ChatClient,
    timeout: Duration,
}

impl RerankClient {
    pub fn new() -> Result<Self, RerankError> {
        Self::with_timeout(RERANK_TIMEOUT)
    }

    /// Client with a custom deadline, clamped to [`RERANK_TIMEOUT`].
    pub fn with_timeout(timeout: Duration) -> Result<Self, RerankError> {
        Ok(Self {
            chat: ChatClient::new()?,
            timeout: timeout.min(RERANK_TIMEOUT),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ask the model to reorder the first [`MAX_CANDIDATES`] of `ranked`.
    ///
    /// The request is dropped (and with it the connection) once the deadline passes,
    /// so a late reply can never be observed.
    pub async fn rerank<'a>(
        &self,
        query: &str,
        ranked: &[&'a Guide],
        config: &RerankConfig,
    ) -> Result<Vec<&'a Guide>, RerankError> {
        let candidates = &ranked[..ranked.len().min(MAX_CANDIDATES)];
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let request = build_request(query, candidates, config);
        debug!(
            candidates = candidates.len(),
            model = %request.model,
            timeout_ms = self.timeout.as_millis(),
            "sending rerank request"
        );

        let call = self
            .chat
            .complete(config.endpoint.trim(), config.api_key.trim(), &request);
        let content = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result?,
            Err(_) => return Err(RerankError::Timeout(self.timeout)),
        };

        let ids = parse_id_list(&content)?;
        debug!(returned_ids = ids.len(), "rerank response parsed");
        Ok(reorder(candidates, &ids))
    }
}

fn build_request(query: &str, candidates: &[&Guide], config: &RerankConfig) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.effective_model().to_string(),
        messages: vec![Message {
            role: "user".to_string(),
            content: build_prompt(query, candidates),
        }],
        temperature: Some(TEMPERATURE),
        max_tokens: Some(MAX_TOKENS),
    }
}

/// Step bodies are never included.
fn candidate_payload(candidates: &[&Guide]) -> Value {
    Value::Array(
        candidates
            .iter()
            .map(|g| {
                json!({
                    "id": g.id,
                    "title": g.title,
                    "summary": g.summary,
                    "tags": g.tags,
                })
            })
            .collect(),
    )
}

fn build_prompt(query: &str, candidates: &[&Guide]) -> String {
    let payload = candidate_payload(candidates);
    format!(
        "You rank knowledge-base guides by how well they answer a user's search.\n\n\
         Search query: \"{query}\"\n\n\
         Candidate guides (JSON):\n{payload}\n\n\
         Return ONLY a JSON array with the ids of the most relevant guides, most relevant \
         first, at most {MAX_MODEL_IDS} ids. Example: [\"id-1\", \"id-2\"]",
        query = query.trim(),
    )
}

/// Extract the id list from the model's reply.
///
/// Parses the first `[...]` span in the text, so prose around the array is tolerated.
/// Without any bracket the whole reply is parsed. Nested arrays inside surrounding
/// prose will cut the span short and fail to parse.
pub fn parse_id_list(content: &str) -> Result<Vec<String>, RerankError> {
    let text = first_bracketed_span(content).unwrap_or_else(|| content.trim());
    let value: Value = serde_json::from_str(text)
        .map_err(|e| RerankError::Parse(format!("model reply is not valid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(RerankError::UnexpectedShape(format!(
            "expected a JSON array of ids, got {}",
            json_kind(&value)
        )));
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(id) => Some(id),
            other => {
                debug!(item = %other, "ignoring non-string id in rerank reply");
                None
            }
        })
        .collect())
}

fn first_bracketed_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let len = text[start..].find(']')?;
    Some(&text[start..=start + len])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Order `candidates` by `ids`, then append the unmentioned ones in their original order.
pub fn reorder<'a>(candidates: &[&'a Guide], ids: &[String]) -> Vec<&'a Guide> {
    let mut placed = vec![false; candidates.len()];
    let mut out = Vec::with_capacity(candidates.len());

    for id in ids {
        let Some(pos) = candidates.iter().position(|g| g.id == *id) else {
            continue;
        };
        if !placed[pos] {
            placed[pos] = true;
            out.push(candidates[pos]);
        }
    }

    for (guide, done) in candidates.iter().zip(placed) {
        if !done {
            out.push(*guide);
        }
    }
    out
}
