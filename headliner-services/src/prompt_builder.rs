//! Turns raw stats and news into the text snippets fed to the LLM

use std::cmp::Ordering;
use std::collections::HashSet;

use headliner_core::{CoinStat, NewsItem};

use crate::pipeline::DebugLog;

const PLACEHOLDER: &str = "N/A";

/// Everything derived from one tick's raw data
#[derive(Debug, Clone, Default)]
pub struct PromptSet {
    pub stats_snippet: String,
    pub news_snippet: String,
    /// News mentioning at least one relevant symbol, in feed order
    pub filtered_news: Vec<NewsItem>,
}

/// Selects the top coins and formats prompt snippets
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    top_n: usize,
    precision: usize,
}

impl PromptBuilder {
    pub fn new(top_n: usize, precision: usize) -> Self {
        Self { top_n, precision }
    }

    pub fn build(&self, stats: &[CoinStat], news: &[NewsItem], log: &mut DebugLog) -> PromptSet {
        let top_by_rank = self.top_by_rank(stats);
        let top_by_change = self.top_by_change_4h(stats);

        let rank_symbols = symbols(&top_by_rank);
        let change_symbols = symbols(&top_by_change);
        log.info(format!("Top Rank: {}", rank_symbols.join(", ")));
        log.info(format!("Top Change: {}", change_symbols.join(", ")));

        let relevant_symbols: HashSet<String> =
            rank_symbols.into_iter().chain(change_symbols).collect();

        let stats_snippet = format!(
            "Top by Rank:\n{}\n\nTop by 4h Change:\n{}",
            self.format_coins(&top_by_rank),
            self.format_coins(&top_by_change)
        );

        let filtered_news: Vec<NewsItem> = news
            .iter()
            .filter(|item| item.mentions_any(|ticker| relevant_symbols.contains(ticker)))
            .cloned()
            .collect();
        log.debug(format!("Filtered news count: {}", filtered_news.len()));

        let news_snippet = format_news(&filtered_news);

        PromptSet {
            stats_snippet,
            news_snippet,
            filtered_news,
        }
    }

    /// Ascending rank, unranked coins last, stable for ties
    fn top_by_rank(&self, stats: &[CoinStat]) -> Vec<CoinStat> {
        let mut sorted = stats.to_vec();
        sorted.sort_by_key(|coin| coin.rank.unwrap_or(u32::MAX));
        sorted.truncate(self.top_n);
        sorted
    }

    /// Descending 4h change; coins without a 4h change are left out
    fn top_by_change_4h(&self, stats: &[CoinStat]) -> Vec<CoinStat> {
        let mut with_change: Vec<CoinStat> = stats
            .iter()
            .filter(|coin| coin.change_4h.is_some())
            .cloned()
            .collect();
        with_change.sort_by(|a, b| match (a.change_4h, b.change_4h) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            _ => Ordering::Equal,
        });
        with_change.truncate(self.top_n);
        with_change
    }

    fn format_coins(&self, coins: &[CoinStat]) -> String {
        coins
            .iter()
            .map(|coin| self.format_coin(coin))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_coin(&self, coin: &CoinStat) -> String {
        format!(
            "Name: {} [{}]\nRank: {}\nPrice: ${}\nChange 1h: {}\nChange 4h: {}\nChange 24h: {}\nChange 7d: {}",
            coin.name.as_deref().unwrap_or(PLACEHOLDER),
            coin.ticker().as_deref().unwrap_or(PLACEHOLDER),
            coin.rank
                .map(|r| r.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            coin.price
                .map(|p| p.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            self.format_percent(coin.change_1h),
            self.format_percent(coin.change_4h),
            self.format_percent(coin.change_24h),
            self.format_percent(coin.change_7d),
        )
    }

    fn format_percent(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{:.*}%", self.precision, v),
            _ => PLACEHOLDER.to_string(),
        }
    }
}

fn symbols(coins: &[CoinStat]) -> Vec<String> {
    coins.iter().filter_map(CoinStat::ticker).collect()
}

fn format_news(items: &[NewsItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "{}. Title: \"{}\"\n   Headline: \"{}\"",
                i + 1,
                item.title,
                item.headline
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
