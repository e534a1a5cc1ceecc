//! Token-specific news items

use serde::{Deserialize, Deserializer, Serialize};

/// A news article tagged with the tickers it mentions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Article title
    #[serde(default)]
    pub title: String,
    /// One-line headline/teaser
    #[serde(default)]
    pub headline: String,
    /// Tickers mentioned by the article
    #[serde(default, deserialize_with = "deserialize_tickers")]
    pub tickers: Vec<String>,
}

impl NewsItem {
    /// Whether any of the article's tickers, upper-cased, passes `contains`
    pub fn mentions_any(&self, mut contains: impl FnMut(&str) -> bool) -> bool {
        self.tickers
            .iter()
            .any(|ticker| contains(ticker.to_uppercase().as_str()))
    }
}

/// Accept `null`, non-array and mixed-type ticker lists; keep string entries only
fn deserialize_tickers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let tickers = match raw {
        Some(serde_json::Value::Array(values)) => values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(tickers)
}
