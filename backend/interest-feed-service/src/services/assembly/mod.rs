use crate::models::ContentItem;
use std::collections::HashSet;
use tracing::debug;

/// Items per pool in the returned feed unless configured otherwise
pub const DEFAULT_FEED_ITEM_CAP: usize = 30;

/// Feed Assembler - 去重並截斷
///
/// Keeps the first occurrence of every id in retrieval order, then caps the
/// result. Relevance ordering is left to the content store.
#[derive(Debug, Clone, Copy)]
pub struct FeedAssembler {
    cap: usize,
}

impl Default for FeedAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_ITEM_CAP)
    }
}

impl FeedAssembler {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    pub fn assemble(&self, candidates: Vec<ContentItem>) -> Vec<ContentItem> {
        let total = candidates.len();
        let mut seen: HashSet<String> = HashSet::new();
        let mut feed: Vec<ContentItem> = Vec::new();

        for candidate in candidates {
            if feed.len() >= self.cap {
                break;
            }
            if seen.insert(candidate.id.clone()) {
                feed.push(candidate);
            }
        }

        debug!(
            candidates = total,
            assembled = feed.len(),
            cap = self.cap,
            "Assembled feed"
        );

        feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EngagementSignals;

    fn item(id: &str, tag: &str) -> ContentItem {
        ContentItem::new(id, [tag], EngagementSignals::default())
    }

    fn ids(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_assemble_empty() {
        assert!(FeedAssembler::default().assemble(Vec::new()).is_empty());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let assembler = FeedAssembler::new(10);
        let feed = assembler.assemble(vec![
            item("p1", "first"),
            item("p2", "music"),
            item("p1", "second"),
            item("p3", "food"),
            item("p2", "again"),
        ]);

        assert_eq!(ids(&feed), vec!["p1", "p2", "p3"]);
        assert_eq!(feed[0].interests, vec!["first"]);
    }

    #[test]
    fn test_cap_applies_after_dedup() {
        let assembler = FeedAssembler::new(3);
        let feed = assembler.assemble(vec![
            item("a", "x"),
            item("a", "x"),
            item("b", "x"),
            item("a", "x"),
            item("c", "x"),
            item("d", "x"),
        ]);

        assert_eq!(ids(&feed), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_zero_cap() {
        let feed = FeedAssembler::new(0).assemble(vec![item("a", "x")]);
        assert!(feed.is_empty());
    }
}
