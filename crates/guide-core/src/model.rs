use serde::{Deserialize, Serialize};

/// Model used for reranking when the caller leaves `model` blank.
pub const DEFAULT_RERANK_MODEL: &str = "gpt-3.5-turbo";

/// A single step-by-step guide from the knowledge base.
///
/// Every field defaults when absent so a sparse record never fails to load or score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Guide {
    /// Identifier, unique within one collection (enforced by the store)
    pub id: String,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub steps: Vec<Step>,
}

/// One step within a guide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Step {
    pub title: String,
    /// Step body; may contain markup tags
    pub body_rich: String,
}

/// Which part of a guide a highlight snippet came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightField {
    Title,
    Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub field: HighlightField,
    pub text: String,
}

/// A guide paired with its keyword score for one search call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredGuide<'a> {
    pub guide: &'a Guide,
    pub score: f64,
    pub highlights: Vec<Highlight>,
}

/// Per-call rerank settings. Read-only; the search core never stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RerankConfig {
    pub enabled: bool,
    /// Full URL of an OpenAI-compatible chat completions endpoint
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_key: String::new(),
            model: DEFAULT_RERANK_MODEL.to_string(),
        }
    }
}

impl RerankConfig {
    /// True when reranking is switched on and both endpoint and key are present.
    pub fn is_ready(&self) -> bool {
        self.enabled && !self.endpoint.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    pub fn effective_model(&self) -> &str {
        let model = self.model.trim();
        if model.is_empty() {
            DEFAULT_RERANK_MODEL
        } else {
            model
        }
    }
}
