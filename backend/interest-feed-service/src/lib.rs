pub mod config;
pub mod models;
pub mod pipeline;
pub mod services;

pub use config::{Config, FeedConfig};
pub use models::{ContentItem, EngagementSignals, FeedResult, InteractionBundle, Pool};
pub use pipeline::{FeedPipeline, RequestError};
pub use services::{ContentStore, InMemoryContentStore, RedisContentStore};
