use anyhow::Context;
use interest_feed_service::{Config, FeedPipeline, RedisContentStore};
use std::io::Read;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Usage: interest-feed-service [REQUEST_FILE]
///
/// Reads one feed request (JSON) from REQUEST_FILE or stdin, writes the feed
/// response to stdout. Logs go to stderr.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load config")?;

    info!(
        service = %config.service.service_name,
        redis_prefix = %config.redis.key_prefix,
        top_interests = config.feed.top_interest_count,
        item_cap = config.feed.feed_item_cap,
        retrieval_timeout_ms = config.feed.retrieval_timeout_ms,
        "Starting feed request"
    );

    let store = RedisContentStore::open(&config.redis.url, config.redis.key_prefix.clone())
        .context("Failed to create Redis client")?;
    let pipeline = FeedPipeline::new(Arc::new(store), &config.feed);

    let request = read_request(std::env::args().nth(1))?;
    let response = pipeline.handle_json(&request).await?;

    println!("{}", response);
    Ok(())
}

fn init_tracing() {
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));

    let (plain_layer, json_layer) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(plain_layer)
        .with(json_layer)
        .init();
}

fn read_request(path: Option<String>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read request file {}", path)),
        None => {
            let mut request = String::new();
            std::io::stdin()
                .read_to_string(&mut request)
                .context("Failed to read request from stdin")?;
            Ok(request)
        }
    }
}
