//! Market statistics as served by the stats endpoint

use serde::{Deserialize, Serialize};

/// One coin record from the stats feed
///
/// Every numeric field is optional: the upstream feed occasionally sends
/// `null` or drops a field entirely, and callers substitute a placeholder
/// instead of failing. Fields the service never reads (`image`, `updated`,
/// volumes) are discarded during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinStat {
    /// Ticker as sent by the feed (case not normalized)
    #[serde(rename = "symbolname", default)]
    pub symbol: Option<String>,
    /// Human readable coin name
    #[serde(default)]
    pub name: Option<String>,
    /// Market-cap rank (1 = largest)
    #[serde(default)]
    pub rank: Option<u32>,
    /// Price in USD
    #[serde(default)]
    pub price: Option<f64>,
    /// Percent change over the last hour
    #[serde(rename = "change1h", default)]
    pub change_1h: Option<f64>,
    /// Percent change over the last four hours
    #[serde(rename = "change4h", default)]
    pub change_4h: Option<f64>,
    /// Percent change over the last day
    #[serde(rename = "change24h", default)]
    pub change_24h: Option<f64>,
    /// Percent change over the last week
    #[serde(rename = "change7d", default)]
    pub change_7d: Option<f64>,
}

impl CoinStat {
    /// Upper-cased ticker, if the record has one
    pub fn ticker(&self) -> Option<String> {
        self.symbol.as_ref().map(|s| s.to_uppercase())
    }

    /// Whether this coin sits inside the top `n` by rank
    pub fn is_ranked_within(&self, n: u32) -> bool {
        matches!(self.rank, Some(rank) if rank <= n)
    }

    /// The four percent-change windows in a fixed order (1h, 4h, 24h, 7d)
    pub fn changes(&self) -> [Option<f64>; 4] {
        [self.change_1h, self.change_4h, self.change_24h, self.change_7d]
    }
}

/// Ordered list of coin records captured in a single tick
pub type MarketSnapshot = Vec<CoinStat>;
