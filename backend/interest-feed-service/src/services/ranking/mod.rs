//! Ranking Module
//!
//! Orders one pool of interacted items by engagement score.
//!
//! # Workflow
//! 1. Score every item with [`EngagementScorer`]
//! 2. Stable sort by score, highest first
//!
//! Items with equal scores keep their input order, so a ranking is fully
//! determined by its input.

use crate::models::{ContentItem, RankedItem};
use crate::services::scoring::EngagementScorer;
use tracing::debug;

/// Ranking Layer - 互動分數排序
#[derive(Debug, Clone, Default)]
pub struct ContentRanker {
    scorer: EngagementScorer,
}

impl ContentRanker {
    pub fn new(scorer: EngagementScorer) -> Self {
        Self { scorer }
    }

    pub fn rank(&self, items: Vec<ContentItem>) -> Vec<RankedItem> {
        let mut ranked: Vec<RankedItem> = items
            .into_iter()
            .map(|item| {
                let score = self.scorer.score(&item.engagement);
                RankedItem { item, score }
            })
            .collect();

        // slice::sort_by is stable
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(count = ranked.len(), "Ranked pool by engagement");

        ranked
    }
}
