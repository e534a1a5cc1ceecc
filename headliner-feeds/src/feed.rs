//! Source of per-tick market data

use async_trait::async_trait;
use headliner_core::{MarketSnapshot, NewsItem};

use crate::FeedError;

/// Anything that can hand the pipeline a fresh stats list and news list
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Fetch the current coin statistics
    async fn fetch_stats(&self) -> Result<MarketSnapshot, FeedError>;

    /// Fetch the current token-specific news
    async fn fetch_news(&self) -> Result<Vec<NewsItem>, FeedError>;
}
