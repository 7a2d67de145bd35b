/// Failures of the optional rerank stage.
///
/// Every variant is recoverable: the search orchestrator matches on the result,
/// logs the error and falls back to keyword ranking. None of these ever reach the caller.
use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum RerankError {
    #[error("failed to build http client: {0}")]
    ClientInit(#[source] reqwest::Error),

    #[error("rerank request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("rerank request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rerank endpoint returned status={status} body={body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("could not parse rerank response: {0}")]
    Parse(String),

    #[error("unexpected rerank response shape: {0}")]
    UnexpectedShape(String),
}

/// Coarse classification of [`RerankError`] for logs and search outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerankErrorKind {
    ClientInit,
    Timeout,
    Transport,
    UnexpectedStatus,
    Parse,
    UnexpectedShape,
}

impl RerankError {
    pub fn kind(&self) -> RerankErrorKind {
        match self {
            RerankError::ClientInit(_) => RerankErrorKind::ClientInit,
            RerankError::Timeout(_) => RerankErrorKind::Timeout,
            RerankError::Transport(_) => RerankErrorKind::Transport,
            RerankError::UnexpectedStatus { .. } => RerankErrorKind::UnexpectedStatus,
            RerankError::Parse(_) => RerankErrorKind::Parse,
            RerankError::UnexpectedShape(_) => RerankErrorKind::UnexpectedShape,
        }
    }
}

impl RerankErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RerankErrorKind::ClientInit => "client_init",
            RerankErrorKind::Timeout => "timeout",
            RerankErrorKind::Transport => "transport",
            RerankErrorKind::UnexpectedStatus => "unexpected_status",
            RerankErrorKind::Parse => "parse",
            RerankErrorKind::UnexpectedShape => "unexpected_shape",
        }
    }
}

impl fmt::Display for RerankErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
