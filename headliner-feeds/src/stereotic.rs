//! Stereotic data client for market stats and token-specific news
//!
//! Both endpoints serve a plain JSON array. Free API, no authentication required.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use headliner_core::{MarketSnapshot, NewsItem};

use crate::{FeedError, MarketFeed};

pub const DEFAULT_STATS_URL: &str = "https://stereotic.com/data/stats/top100_stat.json";
pub const DEFAULT_NEWS_URL: &str = "https://stereotic.com/data/news/token-specific.json";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the stats and news endpoints
#[derive(Debug, Clone)]
pub struct StereoticClient {
    http: Client,
    stats_url: String,
    news_url: String,
}

impl StereoticClient {
    /// Create a client against the default endpoints
    pub fn new() -> Result<Self, FeedError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client whose every request is bounded by `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, FeedError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("Headliner/0.1")
            .build()
            .map_err(|e| FeedError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            stats_url: DEFAULT_STATS_URL.to_string(),
            news_url: DEFAULT_NEWS_URL.to_string(),
        })
    }

    /// Point the client at different endpoints
    pub fn with_urls(mut self, stats_url: impl Into<String>, news_url: impl Into<String>) -> Self {
        self.stats_url = stats_url.into();
        self.news_url = news_url.into();
        self
    }

    /// Fetch a JSON array, keeping every element that decodes as `T`
    ///
    /// A single malformed record is logged and dropped; a body that is not an
    /// array at all fails the fetch.
    async fn fetch_records<T: DeserializeOwned>(
        &self,
        url: &str,
        kind: &str,
    ) -> Result<Vec<T>, FeedError> {
        debug!("[Stereotic] Fetching {} from: {}", kind, url);

        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout(format!("{}: {}", url, e))
            } else {
                FeedError::NetworkError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(FeedError::HttpError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let raw: Vec<serde_json::Value> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout(format!("{}: {}", url, e))
            } else {
                FeedError::ParseError(format!("{} body is not a JSON array: {}", kind, e))
            }
        })?;

        let total = raw.len();
        let records: Vec<T> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("[Stereotic] Skipping malformed {} record #{}: {}", kind, idx, e);
                    None
                }
            })
            .collect();

        info!("[Stereotic] Fetched {} {} records ({} received)", records.len(), kind, total);
        Ok(records)
    }
}

#[async_trait]
impl MarketFeed for StereoticClient {
    #[instrument(skip(self))]
    async fn fetch_stats(&self) -> Result<MarketSnapshot, FeedError> {
        self.fetch_records(&self.stats_url, "stats").await
    }

    #[instrument(skip(self))]
    async fn fetch_news(&self) -> Result<Vec<NewsItem>, FeedError> {
        self.fetch_records(&self.news_url, "news").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StereoticClient {
        StereoticClient::new().unwrap().with_urls(
            format!("{}/stats.json", server.uri()),
            format!("{}/news.json", server.uri()),
        )
    }

    #[tokio::test]
    async fn test_fetch_stats() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "symbolname": "btc",
                    "name": "Bitcoin",
                    "rank": 1,
                    "price": 64000.0,
                    "change1h": 0.1,
                    "change4h": 0.5,
                    "change24h": 2.0,
                    "change7d": 5.0,
                    "image": "https://example.com/btc.png",
                    "updated": "2025-03-01T10:00:00Z"
                },
                {
                    "symbolname": "eth",
                    "rank": 2,
                    "change4h": null
                }
            ])))
            .mount(&mock_server)
            .await;

        let stats = client_for(&mock_server).fetch_stats().await.unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].ticker().as_deref(), Some("BTC"));
        assert_eq!(stats[0].change_24h, Some(2.0));
        assert_eq!(stats[1].change_4h, None);
    }

    #[tokio::test]
    async fn test_fetch_news_skips_malformed_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/news.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"title": "ETF inflows", "headline": "Record week", "tickers": ["BTC"]},
                "not an object",
                {"title": "Upgrade ships", "headline": "Mainnet live", "tickers": ["ETH"]}
            ])))
            .mount(&mock_server)
            .await;

        let news = client_for(&mock_server).fetch_news().await.unwrap();

        assert_eq!(news.len(), 2);
        assert_eq!(news[0].title, "ETF inflows");
        assert_eq!(news[1].tickers, vec!["ETH".to_string()]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).fetch_stats().await.unwrap_err();
        assert!(matches!(err, FeedError::HttpError { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_non_array_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/news.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "maintenance"})),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).fetch_news().await.unwrap_err();
        assert!(matches!(err, FeedError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let client = StereoticClient::with_timeout(Duration::from_millis(50))
            .unwrap()
            .with_urls(
                format!("{}/stats.json", mock_server.uri()),
                format!("{}/news.json", mock_server.uri()),
            );

        let err = client.fetch_stats().await.unwrap_err();
        assert!(matches!(err, FeedError::Timeout(_)));
    }

    #[test]
    fn test_feed_error_converts_to_headliner_error() {
        use headliner_core::HeadlinerError;

        let err: HeadlinerError = FeedError::Timeout("stats".to_string()).into();
        assert!(matches!(err, HeadlinerError::Timeout(_)));

        let err: HeadlinerError = FeedError::ParseError("bad".to_string()).into();
        assert!(matches!(err, HeadlinerError::Parse(_)));
    }
}
