#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read guide snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid guide snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error(transparent)]
    Rerank(#[from] guide_core::error::RerankError),
}
