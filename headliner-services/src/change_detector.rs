//! Decides whether market data moved enough to justify spending LLM tokens
//!
//! Two independent signals are combined: the set of relevant news articles
//! changed, or one of the top-ranked coins moved by more than a threshold in
//! any of its change windows. Either one is enough.

use headliner_core::{CoinStat, NewsItem};

/// Result of comparing the current tick with the persisted snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeAssessment {
    pub news_identical: bool,
    pub stats_changed: bool,
}

impl ChangeAssessment {
    pub fn is_significant(&self) -> bool {
        !self.news_identical || self.stats_changed
    }
}

#[derive(Debug, Clone)]
pub struct ChangeDetector {
    /// Rank cutoff for the coins that are compared
    top_n: u32,
    /// Largest tolerated absolute move, in percentage points
    threshold: f64,
}

impl ChangeDetector {
    pub fn new(top_n: usize, threshold: f64) -> Self {
        Self {
            top_n: u32::try_from(top_n).unwrap_or(u32::MAX),
            threshold,
        }
    }

    pub fn assess(
        &self,
        previous_stats: Option<&[CoinStat]>,
        current_stats: &[CoinStat],
        previous_news: Option<&[NewsItem]>,
        current_news: &[NewsItem],
    ) -> ChangeAssessment {
        ChangeAssessment {
            news_identical: news_identical(previous_news, current_news),
            stats_changed: self.stats_changed(previous_stats, current_stats),
        }
    }

    /// Whether any top-ranked coin changed materially
    ///
    /// With no previous snapshot everything counts as changed.
    pub fn stats_changed(&self, previous: Option<&[CoinStat]>, current: &[CoinStat]) -> bool {
        let Some(previous) = previous else {
            return true;
        };

        let prev_top: Vec<&CoinStat> = previous
            .iter()
            .filter(|c| c.is_ranked_within(self.top_n))
            .collect();
        let curr_top: Vec<&CoinStat> = current
            .iter()
            .filter(|c| c.is_ranked_within(self.top_n))
            .collect();

        if prev_top.len() != curr_top.len() {
            return true;
        }

        prev_top.iter().any(|prev| {
            let Some(curr) = curr_top.iter().find(|c| c.symbol == prev.symbol) else {
                // A coin fell out of the top N
                return true;
            };

            prev.changes()
                .into_iter()
                .zip(curr.changes())
                .any(|pair| match pair {
                    (Some(before), Some(after)) => (before - after).abs() > self.threshold,
                    _ => false,
                })
        })
    }
}

/// Same articles on both sides, ignoring order
///
/// With no previous snapshot the news is never identical.
pub fn news_identical(previous: Option<&[NewsItem]>, current: &[NewsItem]) -> bool {
    let Some(previous) = previous else {
        return false;
    };
    if previous.len() != current.len() {
        return false;
    }

    let by_identity =
        |a: &&NewsItem, b: &&NewsItem| (&a.title, &a.headline).cmp(&(&b.title, &b.headline));
    let mut prev: Vec<&NewsItem> = previous.iter().collect();
    let mut curr: Vec<&NewsItem> = current.iter().collect();
    prev.sort_by(by_identity);
    curr.sort_by(by_identity);

    prev.iter()
        .zip(curr.iter())
        .all(|(a, b)| a.title == b.title && a.headline == b.headline)
}
