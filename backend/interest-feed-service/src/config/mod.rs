use crate::services::assembly::DEFAULT_FEED_ITEM_CAP;
use crate::services::interests::DEFAULT_TOP_INTERESTS;
use crate::services::retrieval::DEFAULT_RETRIEVAL_LIMIT;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Engagement weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub redis: RedisConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

/// Pipeline tuning, read from `FEED_*` variables
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Interests kept per pool after aggregation
    #[serde(default = "default_top_interest_count")]
    pub top_interest_count: usize,
    /// Maximum items per pool in the returned feed
    #[serde(default = "default_item_cap", rename = "item_cap")]
    pub feed_item_cap: usize,
    /// Candidates requested from the content store per pool
    #[serde(default = "default_retrieval_limit")]
    pub retrieval_limit: usize,
    #[serde(default = "default_retrieval_timeout_ms")]
    pub retrieval_timeout_ms: u64,
    #[serde(skip)]
    pub weights: EngagementWeights,
}

/// Per-signal weights used by the engagement scorer, read from `FEED_WEIGHT_*`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EngagementWeights {
    #[serde(default = "default_view_weight")]
    pub view: f64,
    #[serde(default = "default_like_weight")]
    pub like: f64,
    #[serde(default = "default_comment_weight")]
    pub comment: f64,
    #[serde(default = "default_share_weight")]
    pub share: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            view: default_view_weight(),
            like: default_like_weight(),
            comment: default_comment_weight(),
            share: default_share_weight(),
        }
    }
}

impl EngagementWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("view", self.view),
            ("like", self.like),
            ("comment", self.comment),
            ("share", self.share),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            top_interest_count: default_top_interest_count(),
            feed_item_cap: default_item_cap(),
            retrieval_limit: default_retrieval_limit(),
            retrieval_timeout_ms: default_retrieval_timeout_ms(),
            weights: EngagementWeights::default(),
        }
    }
}

impl FeedConfig {
    pub fn retrieval_timeout(&self) -> Duration {
        Duration::from_millis(self.retrieval_timeout_ms)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut feed: FeedConfig = envy::prefixed("FEED_").from_env()?;
        feed.weights = envy::prefixed("FEED_WEIGHT_").from_env()?;
        feed.weights.validate()?;
        Ok(feed)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            service: envy::from_env()?,
            redis: envy::prefixed("REDIS_").from_env()?,
            feed: FeedConfig::from_env()?,
        })
    }
}

fn default_service_name() -> String {
    "interest-feed-service".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "feed".to_string()
}

fn default_top_interest_count() -> usize {
    DEFAULT_TOP_INTERESTS
}

fn default_item_cap() -> usize {
    DEFAULT_FEED_ITEM_CAP
}

fn default_retrieval_limit() -> usize {
    DEFAULT_RETRIEVAL_LIMIT
}

fn default_retrieval_timeout_ms() -> u64 {
    500
}

fn default_view_weight() -> f64 {
    1.0
}

fn default_like_weight() -> f64 {
    2.0
}

fn default_comment_weight() -> f64 {
    3.0
}

fn default_share_weight() -> f64 {
    4.0
}
