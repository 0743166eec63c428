use super::{ContentStore, ContentStoreError};
use crate::models::{ContentItem, Pool};
use async_trait::async_trait;
use std::collections::HashSet;

/// In-memory content store
///
/// Returns catalog items sharing at least one requested tag, in insertion
/// order. Used for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentStore {
    posts: Vec<ContentItem>,
    clips: Vec<ContentItem>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, pool: Pool, items: impl IntoIterator<Item = ContentItem>) -> Self {
        self.catalog_mut(pool).extend(items);
        self
    }

    pub fn insert(&mut self, pool: Pool, item: ContentItem) {
        self.catalog_mut(pool).push(item);
    }

    pub fn len(&self, pool: Pool) -> usize {
        self.catalog(pool).len()
    }

    fn catalog(&self, pool: Pool) -> &Vec<ContentItem> {
        match pool {
            Pool::Posts => &self.posts,
            Pool::Clips => &self.clips,
        }
    }

    fn catalog_mut(&mut self, pool: Pool) -> &mut Vec<ContentItem> {
        match pool {
            Pool::Posts => &mut self.posts,
            Pool::Clips => &mut self.clips,
        }
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn find_by_interests(
        &self,
        pool: Pool,
        tags: &[String],
        limit: usize,
    ) -> Result<Vec<ContentItem>, ContentStoreError> {
        let wanted: HashSet<&str> = tags.iter().map(String::as_str).collect();

        Ok(self
            .catalog(pool)
            .iter()
            .filter(|item| item.interests.iter().any(|t| wanted.contains(t.as_str())))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EngagementSignals;

    fn item(id: &str, tags: &[&str]) -> ContentItem {
        ContentItem::new(id, tags.iter().copied(), EngagementSignals::default())
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_find_matches_any_tag_in_insertion_order() {
        let store = InMemoryContentStore::new().with_items(
            Pool::Posts,
            vec![
                item("p1", &["music"]),
                item("p2", &["cars"]),
                item("p3", &["food", "music"]),
                item("p4", &["travel"]),
            ],
        );

        let found = store
            .find_by_interests(Pool::Posts, &tags(&["music", "travel"]), 10)
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|i| i.id.as_str()).collect();

        assert_eq!(ids, vec!["p1", "p3", "p4"]);
    }

    #[tokio::test]
    async fn test_find_respects_limit_and_pool() {
        let mut store = InMemoryContentStore::new();
        for n in 0..5 {
            store.insert(Pool::Clips, item(&format!("c{}", n), &["music"]));
        }

        assert_eq!(store.len(Pool::Clips), 5);
        assert_eq!(store.len(Pool::Posts), 0);

        let clips = store
            .find_by_interests(Pool::Clips, &tags(&["music"]), 3)
            .await
            .unwrap();
        assert_eq!(clips.len(), 3);

        let posts = store
            .find_by_interests(Pool::Posts, &tags(&["music"]), 3)
            .await
            .unwrap();
        assert!(posts.is_empty());
    }
}
