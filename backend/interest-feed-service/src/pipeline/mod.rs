use crate::config::FeedConfig;
use crate::models::{ContentItem, FeedResult, InteractionBundle, Pool, PoolStats};
use crate::services::{
    ContentRanker, ContentStore, EngagementScorer, FeedAssembler, FeedRetriever, InterestAggregator,
};
use serde::de::Error as _;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::info;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid feed request: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("Failed to serialize feed response: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Feed Pipeline - rank → interests → retrieve → assemble, per pool
///
/// Posts and clips run concurrently and share nothing but the read-only
/// stages. A retrieval failure only empties its own pool and is reported as a
/// warning; building a feed never fails.
pub struct FeedPipeline {
    ranker: ContentRanker,
    aggregator: InterestAggregator,
    retriever: FeedRetriever,
    assembler: FeedAssembler,
    retrieval_limit: usize,
    retrieval_timeout: Duration,
}

struct PoolOutcome {
    feed: Vec<ContentItem>,
    warning: Option<String>,
}

impl FeedPipeline {
    pub fn new(store: Arc<dyn ContentStore>, config: &FeedConfig) -> Self {
        Self {
            ranker: ContentRanker::new(EngagementScorer::new(config.weights)),
            aggregator: InterestAggregator::new(config.top_interest_count),
            retriever: FeedRetriever::new(store),
            assembler: FeedAssembler::new(config.feed_item_cap),
            retrieval_limit: config.retrieval_limit,
            retrieval_timeout: config.retrieval_timeout(),
        }
    }

    /// Build a feed, bounding retrieval by the configured timeout
    pub async fn build_feed(&self, bundle: InteractionBundle) -> FeedResult {
        let deadline = Instant::now() + self.retrieval_timeout;
        self.build_feed_with_deadline(bundle, deadline).await
    }

    /// Build a feed, bounding retrieval by a caller-supplied deadline
    pub async fn build_feed_with_deadline(
        &self,
        bundle: InteractionBundle,
        deadline: Instant,
    ) -> FeedResult {
        let InteractionBundle { uid, posts, clips } = bundle;

        info!(
            uid = %uid,
            posts = posts.len(),
            clips = clips.len(),
            "Feed request received"
        );

        let (posts, clips) = tokio::join!(
            self.run_pool(&uid, Pool::Posts, posts, deadline),
            self.run_pool(&uid, Pool::Clips, clips, deadline),
        );

        let warnings: Vec<String> = [&posts.warning, &clips.warning]
            .into_iter()
            .flatten()
            .cloned()
            .collect();

        info!(
            uid = %uid,
            posts = posts.feed.len(),
            clips = clips.feed.len(),
            warnings = warnings.len(),
            "Feed built"
        );

        FeedResult {
            posts: posts.feed,
            clips: clips.feed,
            warnings,
        }
    }

    /// Adapter for the request layer: JSON request in, JSON response out
    ///
    /// The request must be a JSON object; arrays and scalars are rejected
    /// before any field recovery runs.
    pub async fn handle_json(&self, request: &str) -> Result<String, RequestError> {
        let value: serde_json::Value =
            serde_json::from_str(request).map_err(RequestError::InvalidRequest)?;
        if !value.is_object() {
            return Err(RequestError::InvalidRequest(serde_json::Error::custom(
                "feed request must be a JSON object",
            )));
        }
        let bundle: InteractionBundle =
            serde_json::from_value(value).map_err(RequestError::InvalidRequest)?;
        let result = self.build_feed(bundle).await;
        serde_json::to_string(&result).map_err(RequestError::Serialize)
    }

    async fn run_pool(
        &self,
        uid: &str,
        pool: Pool,
        items: Vec<ContentItem>,
        deadline: Instant,
    ) -> PoolOutcome {
        let mut stats = PoolStats {
            interactions: items.len(),
            ..PoolStats::default()
        };

        let ranked = self.ranker.rank(items);
        let interests = self.aggregator.collect_interests(&ranked);
        stats.interests = interests.len();

        let (candidates, warning) = match self
            .retriever
            .retrieve(pool, &interests, self.retrieval_limit, deadline)
            .await
        {
            Ok(candidates) => (candidates, None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };
        stats.candidates = candidates.len();

        let feed = self.assembler.assemble(candidates);
        stats.final_count = feed.len();

        info!(
            uid = %uid,
            pool = %pool,
            interactions = stats.interactions,
            interests = stats.interests,
            candidates = stats.candidates,
            final_count = stats.final_count,
            degraded = warning.is_some(),
            "Pool pipeline completed"
        );

        PoolOutcome { feed, warning }
    }
}
