pub mod assembly;
pub mod interests;
pub mod ranking;
pub mod retrieval;
pub mod scoring;

pub use assembly::FeedAssembler;
pub use interests::InterestAggregator;
pub use ranking::ContentRanker;
pub use retrieval::{
    ContentStore, ContentStoreError, FeedRetriever, InMemoryContentStore, RedisContentStore,
    RetrievalError,
};
pub use scoring::EngagementScorer;
