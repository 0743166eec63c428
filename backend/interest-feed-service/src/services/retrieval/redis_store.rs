use super::{ContentStore, ContentStoreError};
use crate::models::{ContentItem, Pool};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Redis content store - 興趣標籤召回
///
/// Key layout:
/// - `{prefix}:{pool}:interest:{tag}` Sorted Set of item ids, score = store relevance
/// - `{prefix}:{pool}:item:{id}` JSON-encoded content item
pub struct RedisContentStore {
    redis_client: redis::Client,
    key_prefix: String,
}

impl RedisContentStore {
    pub fn new(redis_client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            redis_client,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn open(url: &str, key_prefix: impl Into<String>) -> Result<Self, ContentStoreError> {
        Ok(Self::new(redis::Client::open(url)?, key_prefix))
    }

    fn interest_key(&self, pool: Pool, tag: &str) -> String {
        format!("{}:{}:interest:{}", self.key_prefix, pool, tag)
    }

    fn item_key(&self, pool: Pool, id: &str) -> String {
        format!("{}:{}:item:{}", self.key_prefix, pool, id)
    }
}

#[async_trait]
impl ContentStore for RedisContentStore {
    async fn find_by_interests(
        &self,
        pool: Pool,
        tags: &[String],
        limit: usize,
    ) -> Result<Vec<ContentItem>, ContentStoreError> {
        if tags.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        // ZREVRANGE {prefix}:{pool}:interest:{tag} 0 {limit-1} WITHSCORES, one per tag
        let stop = zrange_stop(limit);
        let mut pipe = redis::pipe();
        for tag in tags {
            pipe.zrevrange_withscores(self.interest_key(pool, tag), 0, stop);
        }
        let per_tag: Vec<Vec<(String, f64)>> = pipe.query_async(&mut conn).await?;

        let ids = merge_ranked_ids(per_tag, limit);
        if ids.is_empty() {
            debug!(pool = %pool, "No indexed content for interests");
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| self.item_key(pool, id)).collect();
        let bodies: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        let mut items = Vec::with_capacity(bodies.len());
        for (id, body) in ids.iter().zip(bodies) {
            let Some(body) = body else {
                warn!(pool = %pool, id = %id, "Indexed content item has no body");
                continue;
            };
            match serde_json::from_str::<ContentItem>(&body) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!(pool = %pool, id = %id, error = %e, "Skipping undecodable content item")
                }
            }
        }

        Ok(items)
    }
}

/// Inclusive stop index for the first `limit` members; never wraps negative
fn zrange_stop(limit: usize) -> isize {
    isize::try_from(limit).unwrap_or(isize::MAX) - 1
}

/// Merge per-tag (id, relevance) lists: best relevance per id, highest first,
/// ties by id, capped at `limit`.
fn merge_ranked_ids(per_tag: Vec<Vec<(String, f64)>>, limit: usize) -> Vec<String> {
    let mut best: HashMap<String, f64> = HashMap::new();
    for (id, relevance) in per_tag.into_iter().flatten() {
        best.entry(id)
            .and_modify(|current| *current = current.max(relevance))
            .or_insert(relevance);
    }

    let mut ranked: Vec<(String, f64)> = best.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);

    ranked.into_iter().map(|(id, _)| id).collect()
}
