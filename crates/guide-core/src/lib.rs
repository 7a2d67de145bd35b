pub mod error;
pub mod mcp_api;
pub mod model;
pub mod openai;
pub mod ranker;
pub mod rerank;
pub mod scorer;
pub mod search;
pub mod tokenize;
