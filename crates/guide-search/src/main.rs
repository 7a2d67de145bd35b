mod config;
mod error;
mod server;
mod store;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use server::GuideSearchServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting guide-search MCP server");

    let config = Config::from_env()?;
    info!(
        guides_path = %config.guides_path,
        rerank_enabled = config.rerank.enabled,
        rerank_ready = config.rerank.is_ready(),
        rerank_model = config.rerank.effective_model(),
        rerank_timeout_ms = config.rerank_timeout.as_millis(),
        "configuration loaded"
    );
    if config.rerank.enabled && !config.rerank.is_ready() {
        info!("rerank enabled but RERANK_ENDPOINT or RERANK_API_KEY is empty, keyword ranking only");
    }

    let guides = store::load_snapshot(&config.guides_path())?;
    info!(guides = guides.len(), "guide snapshot loaded");

    let server = GuideSearchServer::new(guides, config)?;

    if let Ok(addr) = std::env::var("MCP_TCP_LISTEN_ADDR") {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
