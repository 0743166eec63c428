// ============================================
// Interest Aggregator (興趣標籤聚合)
// ============================================
//
// Derives a pool's dominant interests from its ranked items.
//
// Interest scoring formula:
// weight(tag) = SUM(score(item)) over every item carrying the tag
//
// Each item credits its full score to every tag it carries. Tags are ordered
// by weight descending, ties alphabetically, and the top k are kept.

use crate::models::{InterestScore, RankedItem};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Interests kept per pool unless configured otherwise
pub const DEFAULT_TOP_INTERESTS: usize = 6;

#[derive(Debug, Clone, Copy)]
pub struct InterestAggregator {
    top_k: usize,
}

impl Default for InterestAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_INTERESTS)
    }
}

impl InterestAggregator {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Accumulate weights for every tag in the pool, heaviest first
    pub fn aggregate(&self, ranked: &[RankedItem]) -> Vec<InterestScore> {
        let mut weights: HashMap<&str, f64> = HashMap::new();

        for entry in ranked {
            // an item's tags form a set; a repeated tag is credited once
            let mut seen: HashSet<&str> = HashSet::new();
            for tag in &entry.item.interests {
                let tag = tag.as_str();
                if tag.is_empty() || !seen.insert(tag) {
                    continue;
                }
                *weights.entry(tag).or_insert(0.0) += entry.score;
            }
        }

        let mut interests: Vec<InterestScore> = weights
            .into_iter()
            .map(|(tag, score)| InterestScore {
                tag: tag.to_string(),
                score,
            })
            .collect();

        interests.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.tag.cmp(&b.tag)));

        interests
    }

    /// Top `k` distinct interest tags for the pool
    pub fn collect_interests(&self, ranked: &[RankedItem]) -> Vec<String> {
        let mut interests = self.aggregate(ranked);
        interests.truncate(self.top_k);

        debug!(
            interest_count = interests.len(),
            top_k = self.top_k,
            "Collected pool interests"
        );

        interests.into_iter().map(|i| i.tag).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentItem, EngagementSignals};

    fn ranked(id: &str, tags: &[&str], score: f64) -> RankedItem {
        RankedItem {
            item: ContentItem::new(id, tags.iter().copied(), EngagementSignals::default()),
            score,
        }
    }

    #[test]
    fn test_empty_pool_has_no_interests() {
        let aggregator = InterestAggregator::default();
        assert!(aggregator.aggregate(&[]).is_empty());
        assert!(aggregator.collect_interests(&[]).is_empty());
    }

    #[test]
    fn test_score_is_credited_to_every_tag() {
        let aggregator = InterestAggregator::new(2);
        let pool = vec![
            ranked("i1", &["a", "b"], 9.0),
            ranked("i2", &["b", "c"], 3.0),
            ranked("i3", &["d"], 0.0),
        ];

        let scores = aggregator.aggregate(&pool);
        assert_eq!(scores[0].tag, "b");
        assert_eq!(scores[0].score, 12.0);
        assert_eq!(scores[1].tag, "a");
        assert_eq!(scores[1].score, 9.0);
        assert_eq!(scores[2].tag, "c");
        assert_eq!(scores[3].tag, "d");

        assert_eq!(aggregator.collect_interests(&pool), vec!["b", "a"]);
    }

    #[test]
    fn test_ties_break_alphabetically() {
        let aggregator = InterestAggregator::new(6);
        let pool = vec![ranked("i1", &["music", "cars", "technology"], 3.0)];

        assert_eq!(
            aggregator.collect_interests(&pool),
            vec!["cars", "music", "technology"]
        );
    }

    #[test]
    fn test_single_item_truncated_to_k() {
        let aggregator = InterestAggregator::new(2);
        let pool = vec![ranked("i1", &["z", "y", "x"], 5.0)];

        assert_eq!(aggregator.collect_interests(&pool), vec!["x", "y"]);
    }

    #[test]
    fn test_tags_are_unique_and_bounded() {
        let aggregator = InterestAggregator::new(3);
        let pool = vec![
            ranked("i1", &["music", "music", "food"], 10.0),
            ranked("i2", &["music", "travel", ""], 7.0),
            ranked("i3", &["food", "art", "design"], 4.0),
            ranked("i4", &["design", "art"], 1.0),
        ];

        let scores = aggregator.aggregate(&pool);
        let music = scores.iter().find(|s| s.tag == "music").unwrap();
        assert_eq!(music.score, 17.0);
        assert!(scores.iter().all(|s| !s.tag.is_empty()));

        let top = aggregator.collect_interests(&pool);
        assert_eq!(top, vec!["music", "food", "travel"]);

        let unique: HashSet<&String> = top.iter().collect();
        assert_eq!(unique.len(), top.len());
    }

    #[test]
    fn test_zero_k_returns_nothing() {
        let aggregator = InterestAggregator::new(0);
        let pool = vec![ranked("i1", &["a"], 1.0)];
        assert!(aggregator.collect_interests(&pool).is_empty());
    }
}
