//! Search orchestration: keyword ranking, optional rerank, guaranteed fallback.
//!
//! ```text
//! Idle -> KeywordRanking -+-> Done                      (rerank not configured)
//!                         +-> LlmReranking -+-> Done    (Reranked)
//!                                           +-> Done    (Fallback: keyword order)
//! ```
use tracing::{debug, warn};

use crate::error::RerankErrorKind;
use crate::model::{Guide, RerankConfig, ScoredGuide};
use crate::ranker;
use crate::rerank::RerankClient;

/// Maximum number of guides a search returns.
pub const RESULT_LIMIT: usize = 10;

/// How a search call finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    /// Rerank was not configured or had nothing to do.
    KeywordOnly,
    Reranked,
    /// Rerank failed; keyword order was returned instead.
    Fallback(RerankErrorKind),
}

impl SearchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStage::KeywordOnly => "keyword_only",
            SearchStage::Reranked => "reranked",
            SearchStage::Fallback(_) => "fallback",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome<'a> {
    /// At most [`RESULT_LIMIT`] guides with their keyword scores, in final order.
    pub results: Vec<ScoredGuide<'a>>,
    pub stage: SearchStage,
}

impl<'a> SearchOutcome<'a> {
    pub fn guides(&self) -> Vec<&'a Guide> {
        self.results.iter().map(|s| s.guide).collect()
    }
}

/// Entry point for guide search. Holds no per-search state; calls are independent.
#[derive(Clone)]
pub struct Searcher {
    reranker: RerankClient,
}

impl Searcher {
    pub fn new(reranker: RerankClient) -> Self {
        Self { reranker }
    }

    /// Search `guides` for `query`. Never fails; returns at most [`RESULT_LIMIT`] guides.
    pub async fn search<'a>(
        &self,
        query: &str,
        guides: &'a [Guide],
        config: &RerankConfig,
    ) -> Vec<&'a Guide> {
        self.search_detailed(query, guides, config).await.guides()
    }

    /// Like [`Searcher::search`], also reporting scores, highlights and the final stage.
    pub async fn search_detailed<'a>(
        &self,
        query: &str,
        guides: &'a [Guide],
        config: &RerankConfig,
    ) -> SearchOutcome<'a> {
        let mut scored = ranker::rank_scored(query, guides);
        debug!(matched = scored.len(), total = guides.len(), "keyword ranking done");

        if !config.is_ready() {
            if config.enabled {
                debug!("rerank enabled but endpoint or api key is missing, skipping");
            }
            return keyword_only(scored);
        }
        if query.trim().is_empty() || scored.is_empty() {
            return keyword_only(scored);
        }

        let ranked: Vec<&'a Guide> = scored.iter().map(|s| s.guide).collect();
        match self.reranker.rerank(query, &ranked, config).await {
            Ok(reranked) => {
                let results = reranked
                    .into_iter()
                    .take(RESULT_LIMIT)
                    .filter_map(|g| scored.iter().find(|s| std::ptr::eq(s.guide, g)).cloned())
                    .collect();
                debug!("rerank succeeded");
                SearchOutcome {
                    results,
                    stage: SearchStage::Reranked,
                }
            }
            Err(e) => {
                let kind = e.kind();
                warn!(error = %e, kind = %kind, "rerank failed, falling back to keyword results");
                scored.truncate(RESULT_LIMIT);
                SearchOutcome {
                    results: scored,
                    stage: SearchStage::Fallback(kind),
                }
            }
        }
    }
}

fn keyword_only(mut scored: Vec<ScoredGuide<'_>>) -> SearchOutcome<'_> {
    scored.truncate(RESULT_LIMIT);
    SearchOutcome {
        results: scored,
        stage: SearchStage::KeywordOnly,
    }
}
