mod memory_store;
mod redis_store;

use crate::models::{ContentItem, Pool};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

pub use memory_store::InMemoryContentStore;
pub use redis_store::RedisContentStore;

/// Candidates requested per pool unless configured otherwise
pub const DEFAULT_RETRIEVAL_LIMIT: usize = 30;

#[derive(Debug, Error)]
pub enum ContentStoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to decode content item: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("{pool} retrieval failed: {source}")]
    Store {
        pool: Pool,
        #[source]
        source: ContentStoreError,
    },

    #[error("{pool} retrieval timed out after {budget:?}")]
    Timeout {
        pool: Pool,
        budget: std::time::Duration,
    },
}

impl RetrievalError {
    pub fn pool(&self) -> Pool {
        match self {
            RetrievalError::Store { pool, .. } | RetrievalError::Timeout { pool, .. } => *pool,
        }
    }
}

/// Content store 特徵：依興趣標籤召回內容
///
/// Implementations return items in store-ranked order, most relevant first,
/// and at most `limit` of them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn find_by_interests(
        &self,
        pool: Pool,
        tags: &[String],
        limit: usize,
    ) -> Result<Vec<ContentItem>, ContentStoreError>;
}

/// Feed Retriever - 依興趣召回候選內容
///
/// Issues a single store call per pool with the pool's full interest set and
/// bounds it by the caller's deadline. No retries.
#[derive(Clone)]
pub struct FeedRetriever {
    store: Arc<dyn ContentStore>,
}

impl FeedRetriever {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn retrieve(
        &self,
        pool: Pool,
        interests: &[String],
        limit: usize,
        deadline: Instant,
    ) -> Result<Vec<ContentItem>, RetrievalError> {
        if interests.is_empty() || limit == 0 {
            debug!(pool = %pool, "No interests to retrieve for");
            return Ok(Vec::new());
        }

        let budget = deadline.saturating_duration_since(Instant::now());

        match timeout_at(deadline, self.store.find_by_interests(pool, interests, limit)).await {
            Ok(Ok(items)) => {
                info!(
                    pool = %pool,
                    interests = interests.len(),
                    retrieved = items.len(),
                    "Retrieved candidates"
                );
                Ok(items)
            }
            Ok(Err(source)) => {
                warn!(pool = %pool, error = %source, "Content store retrieval failed");
                Err(RetrievalError::Store { pool, source })
            }
            Err(_) => {
                warn!(pool = %pool, ?budget, "Content store retrieval timed out");
                Err(RetrievalError::Timeout { pool, budget })
            }
        }
    }
}
