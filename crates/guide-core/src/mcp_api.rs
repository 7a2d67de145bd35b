use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchGuidesParams {
    /// Free-text query describing the task, e.g. "reset vpn password".
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetGuideParams {
    /// Guide ID as returned by search_guides.
    pub guide_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HighlightResult {
    /// "title" or "body"
    pub field: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GuideSearchResult {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    /// Keyword relevance score (0 for an empty query).
    pub score: f64,
    pub highlights: Vec<HighlightResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchGuidesResponse {
    /// "keyword_only", "reranked" or "fallback"
    pub stage: String,
    pub results: Vec<GuideSearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StepDetail {
    pub title: String,
    /// Step body with markup removed.
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GuideDetailResponse {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub steps: Vec<StepDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReloadGuidesResponse {
    pub guide_count: usize,
}
