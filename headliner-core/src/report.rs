//! Persisted report state and the payload handed to report publishers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MarketSnapshot, NewsItem};

/// The durable memory of the service, rewritten after every evaluated tick
///
/// Serialized field names match the `last_report.json` files written by
/// earlier deployments so existing state keeps loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportState {
    pub timestamp: DateTime<Utc>,
    /// Short-form output: title plus one paragraph
    #[serde(default)]
    pub title_summary: Option<String>,
    /// Long-form output, present once a full report has been generated
    #[serde(default)]
    pub content: Option<String>,
    /// Stats snapshot the texts were produced from
    #[serde(default)]
    pub stats: Option<MarketSnapshot>,
    /// Filtered news snapshot the texts were produced from
    #[serde(default)]
    pub news: Option<Vec<NewsItem>>,
}

impl ReportState {
    /// Text the next difference score is computed against
    ///
    /// Older state files only carried `content`, so fall back to it.
    pub fn previous_title_summary(&self) -> Option<&str> {
        self.title_summary
            .as_deref()
            .or(self.content.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Structured report handed to a publisher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub hook: String,
    pub summary: String,
    pub analysis: String,
    pub debug_log: String,
    pub stats_snippet: String,
}
