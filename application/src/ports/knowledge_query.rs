//! Knowledge query port
//!
//! Free-text question in, free-text answer out. Backs the
//! `query_market_data` capability.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the Knowledge Query Service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("Knowledge source unavailable: {0}")]
    Unavailable(String),

    #[error("Knowledge query failed: {0}")]
    QueryFailed(String),
}

impl KnowledgeError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, KnowledgeError::Unavailable(_))
    }
}

/// Port for the Knowledge Query Service
#[async_trait]
pub trait KnowledgeQuery: Send + Sync {
    async fn query(&self, question: &str) -> Result<String, KnowledgeError>;
}
