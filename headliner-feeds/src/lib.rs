//! Data fetchers for the Headliner service
//!
//! This crate provides clients for fetching:
//! - Market stats: top coins with rank, price and percent changes
//! - Token news: articles tagged with the tickers they mention

pub mod error;
pub mod feed;
pub mod stereotic;

pub use error::FeedError;
pub use feed::MarketFeed;
pub use stereotic::{StereoticClient, DEFAULT_NEWS_URL, DEFAULT_STATS_URL};
