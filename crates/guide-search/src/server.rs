use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::store;
use guide_core::mcp_api::{
    GetGuideParams, GuideDetailResponse, GuideSearchResult, HighlightResult,
    ReloadGuidesResponse, SearchGuidesParams, SearchGuidesResponse, StepDetail,
};
use guide_core::model::{Guide, HighlightField, ScoredGuide};
use guide_core::rerank::RerankClient;
use guide_core::search::Searcher;
use guide_core::tokenize::strip_markup;

#[derive(Clone)]
pub struct GuideSearchServer {
    /// Current snapshot. Each call clones the inner `Arc`, so a reload never
    /// changes the collection under an in-flight search.
    guides: Arc<RwLock<Arc<Vec<Guide>>>>,
    searcher: Searcher,
    config: Config,
    tool_router: ToolRouter<GuideSearchServer>,
}

impl GuideSearchServer {
    pub fn new(guides: Vec<Guide>, config: Config) -> Result<Self, AppError> {
        let searcher = Searcher::new(RerankClient::with_timeout(config.rerank_timeout)?);
        Ok(Self {
            guides: Arc::new(RwLock::new(Arc::new(guides))),
            searcher,
            config,
            tool_router: Self::tool_router(),
        })
    }

    async fn snapshot(&self) -> Arc<Vec<Guide>> {
        Arc::clone(&*self.guides.read().await)
    }
}

#[tool_router]
impl GuideSearchServer {
    #[tool(description = "Search the knowledge base for step-by-step guides. Returns up to 10 guides, best first.")]
    async fn search_guides(
        &self,
        Parameters(params): Parameters<SearchGuidesParams>,
    ) -> Result<Json<SearchGuidesResponse>, String> {
        let guides = self.snapshot().await;
        let outcome = self
            .searcher
            .search_detailed(&params.query, &guides, &self.config.rerank)
            .await;

        info!(
            query = %params.query,
            stage = outcome.stage.as_str(),
            results = outcome.results.len(),
            "search_guides"
        );

        Ok(Json(SearchGuidesResponse {
            stage: outcome.stage.as_str().to_string(),
            results: outcome.results.iter().map(to_search_result).collect(),
        }))
    }

    #[tool(description = "Get a guide with all of its steps by ID.")]
    async fn get_guide(
        &self,
        Parameters(params): Parameters<GetGuideParams>,
    ) -> Result<Json<GuideDetailResponse>, String> {
        let guide_id = params.guide_id.trim().to_string();
        if guide_id.is_empty() {
            return Err("guide_id must not be empty".to_string());
        }

        let guides = self.snapshot().await;
        let guide = guides
            .iter()
            .find(|g| g.id == guide_id)
            .ok_or_else(|| format!("guide not found: {guide_id}"))?;

        Ok(Json(to_guide_detail(guide)))
    }

    #[tool(description = "Reload the guide snapshot from disk.")]
    async fn reload_guides(&self) -> Result<Json<ReloadGuidesResponse>, String> {
        info!("reload_guides tool invoked");

        let guides = store::load_snapshot(&self.config.guides_path())
            .map_err(|e| format!("reload failed: {e}"))?;
        let guide_count = guides.len();

        *self.guides.write().await = Arc::new(guides);
        info!(guide_count, "guide snapshot swapped");

        Ok(Json(ReloadGuidesResponse { guide_count }))
    }
}

fn to_search_result(scored: &ScoredGuide<'_>) -> GuideSearchResult {
    let guide = scored.guide;
    GuideSearchResult {
        id: guide.id.clone(),
        title: guide.title.clone(),
        summary: guide.summary.clone(),
        tags: guide.tags.clone(),
        score: scored.score,
        highlights: scored
            .highlights
            .iter()
            .map(|h| HighlightResult {
                field: match h.field {
                    HighlightField::Title => "title",
                    HighlightField::Body => "body",
                }
                .to_string(),
                text: h.text.clone(),
            })
            .collect(),
    }
}

fn to_guide_detail(guide: &Guide) -> GuideDetailResponse {
    GuideDetailResponse {
        id: guide.id.clone(),
        title: guide.title.clone(),
        summary: guide.summary.clone(),
        tags: guide.tags.clone(),
        steps: guide
            .steps
            .iter()
            .map(|s| StepDetail {
                title: s.title.clone(),
                text: strip_markup(&s.body_rich),
            })
            .collect(),
    }
}

#[tool_handler]
impl ServerHandler for GuideSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "guide-search".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Knowledge-base guide search MCP server. Use search_guides with a free-text \
                 description of the task to find step-by-step guides, get_guide to read every \
                 step of a guide by ID, and reload_guides after the knowledge base export changes."
                    .to_string(),
            ),
        }
    }
}
