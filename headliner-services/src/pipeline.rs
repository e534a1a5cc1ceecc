//! The change-gated, two-stage report pipeline
//!
//! Each tick walks the same sequence:
//!
//! 1. cooldown check, aborts without touching any collaborator
//! 2. fetch stats and news, build prompt snippets
//! 3. change gate against the persisted snapshot
//! 4. stage 1: short title + summary
//! 5. semantic difference against the previous title + summary
//! 6. stage 2: full analysis, only above the difference threshold
//! 7. publish, which arms the cooldown on success
//! 8. persist the current snapshots and newest texts
//!
//! Steps 3 and 5 are the cost controls: most ticks end after the gate or
//! after the cheap first stage.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use headliner_core::{HeadlinerResult, ReportPayload, ReportState};
use headliner_feeds::MarketFeed;
use headliner_llm::{prompts, LlmClient};
use tracing::{debug, error, info, instrument, warn};

use crate::change_detector::ChangeDetector;
use crate::clock::{Clock, SystemClock};
use crate::config::PipelineConfig;
use crate::difference::DifferenceScorer;
use crate::prompt_builder::PromptBuilder;
use crate::publisher::ReportPublisher;
use crate::report_parser::parse_report;
use crate::report_store::ReportStore;

/// Process-lifetime memory carried from one tick to the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    /// When the last report was published; drives the cooldown
    pub last_report_time: Option<DateTime<Utc>>,
    /// True until a tick reaches the persist step
    pub is_first_run: bool,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            last_report_time: None,
            is_first_run: true,
        }
    }
}

/// How a tick ended
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Aborted before fetching because a report was published recently
    CoolingDown { remaining_minutes: i64 },
    /// Data did not move enough to call the LLM
    Unchanged,
    /// Title + summary generated but too close to the previous one
    SummaryOnly { difference: f64 },
    Published { difference: f64, report_id: String },
    /// Full report generated but the publisher rejected it
    PublishFailed { difference: f64, error: String },
    /// Previous tick still running, this firing was dropped
    Busy,
    Failed { error: String },
}

/// Human-readable trace of one tick, attached to the published report
#[derive(Debug, Clone, Default)]
pub struct DebugLog {
    buf: String,
}

impl DebugLog {
    pub fn info(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        info!("{}", message);
        self.push("INFO", message);
    }

    pub fn debug(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        debug!("{}", message);
        self.push("DEBUG", message);
    }

    fn push(&mut self, level: &str, message: &str) {
        self.buf.push('[');
        self.buf.push_str(level);
        self.buf.push_str("] ");
        self.buf.push_str(message);
        self.buf.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

pub struct HeadlinePipeline {
    config: PipelineConfig,
    feed: Arc<dyn MarketFeed>,
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn ReportStore>,
    publisher: Arc<dyn ReportPublisher>,
    clock: Arc<dyn Clock>,
    prompt_builder: PromptBuilder,
    detector: ChangeDetector,
    scorer: DifferenceScorer,
}

impl HeadlinePipeline {
    pub fn new(
        config: PipelineConfig,
        feed: Arc<dyn MarketFeed>,
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn ReportStore>,
        publisher: Arc<dyn ReportPublisher>,
    ) -> Self {
        let prompt_builder = PromptBuilder::new(config.top_n, config.price_precision);
        let detector = ChangeDetector::new(config.top_n, config.stats_change_threshold);
        let scorer = DifferenceScorer::new(Arc::clone(&llm), config.model.clone());

        Self {
            config,
            feed,
            llm,
            store,
            publisher,
            clock: Arc::new(SystemClock),
            prompt_builder,
            detector,
            scorer,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one tick; errors are logged and reported in the outcome, never raised
    #[instrument(skip(self, state), fields(first_run = state.is_first_run))]
    pub async fn tick(&self, mut state: PipelineState) -> (PipelineState, TickOutcome) {
        let now = self.clock.now();

        if let Some(remaining_minutes) = self.cooldown_remaining(&state, now) {
            info!(
                "In cooldown period after last report. {} minutes remaining.",
                remaining_minutes
            );
            return (state, TickOutcome::CoolingDown { remaining_minutes });
        }

        match self.evaluate(&mut state).await {
            Ok(outcome) => (state, outcome),
            Err(e) => {
                error!("Headline generation failed: {}", e);
                (state, TickOutcome::Failed { error: e.to_string() })
            }
        }
    }

    /// Whole minutes left in the cooldown, rounded up
    fn cooldown_remaining(&self, state: &PipelineState, now: DateTime<Utc>) -> Option<i64> {
        let last = state.last_report_time?;
        let cooldown = TimeDelta::from_std(self.config.cooldown).unwrap_or(TimeDelta::MAX);
        let elapsed = now.signed_duration_since(last);

        if elapsed >= cooldown {
            return None;
        }
        let remaining_ms = (cooldown - elapsed).num_milliseconds();
        Some(remaining_ms.saturating_add(59_999) / 60_000)
    }

    async fn evaluate(&self, state: &mut PipelineState) -> HeadlinerResult<TickOutcome> {
        let mut log = DebugLog::default();
        log.debug("Starting headline generation check...");

        let stats = self.feed.fetch_stats().await?;
        log.debug(format!("Fetched stats data, length: {}", stats.len()));
        let news = self.feed.fetch_news().await?;
        log.debug(format!("Fetched news data, length: {}", news.len()));

        let prompt_set = self.prompt_builder.build(&stats, &news, &mut log);
        let previous = self.store.load()?;

        let assessment = self.detector.assess(
            previous.as_ref().and_then(|p| p.stats.as_deref()),
            &stats,
            previous.as_ref().and_then(|p| p.news.as_deref()),
            &prompt_set.filtered_news,
        );
        debug!(?assessment, "Change assessment");

        let force = self.config.force_report && state.is_first_run;
        let mut title_summary = None;
        let mut full_report = None;

        let outcome = if self.config.always_run || force || assessment.is_significant() {
            log.info(format!(
                "{}Generating title and summary...",
                if force { "Force report generation requested. " } else { "" }
            ));

            let stage1 = self
                .llm
                .complete(&prompts::title_summary_request(
                    &self.config.model,
                    &prompt_set.stats_snippet,
                    &prompt_set.news_snippet,
                ))
                .await?;
            self.record_output(&stage1);

            let difference = self
                .scorer
                .score(
                    previous.as_ref().and_then(ReportState::previous_title_summary),
                    &stage1,
                )
                .await?;
            log.info(format!(
                "Difference score between current and last title summary: {}",
                difference
            ));

            let outcome = if difference >= self.config.diff_threshold || force {
                log.info(format!(
                    "{}Generating full market analysis...",
                    if force { "Forced report generation. " } else { "Significant difference detected. " }
                ));

                let report = self
                    .llm
                    .complete(&prompts::market_analysis_request(
                        &self.config.model,
                        &prompt_set.stats_snippet,
                        &prompt_set.news_snippet,
                        &stage1,
                    ))
                    .await?;
                self.record_output(&report);

                let outcome = self
                    .publish(state, &report, &prompt_set.stats_snippet, difference, &mut log)
                    .await;
                full_report = Some(report);
                outcome
            } else {
                log.info("No significant difference detected. Skipping full LLM generation.");
                info!(
                    "Data changed but not enough for a new report (diff score: {}). Skipping report generation.",
                    difference
                );
                TickOutcome::SummaryOnly { difference }
            };

            title_summary = Some(stage1);
            outcome
        } else {
            log.info("No significant data changes detected. Skipping LLM call.");
            TickOutcome::Unchanged
        };

        let next = ReportState {
            timestamp: self.clock.now(),
            title_summary: title_summary.or_else(|| {
                previous
                    .as_ref()
                    .and_then(ReportState::previous_title_summary)
                    .map(str::to_string)
            }),
            content: full_report.or_else(|| previous.as_ref().and_then(|p| p.content.clone())),
            stats: Some(stats),
            news: Some(prompt_set.filtered_news),
        };
        self.store.save(&next)?;

        state.is_first_run = false;
        Ok(outcome)
    }

    async fn publish(
        &self,
        state: &mut PipelineState,
        report: &str,
        stats_snippet: &str,
        difference: f64,
        log: &mut DebugLog,
    ) -> TickOutcome {
        let parsed = parse_report(report);
        if parsed.is_degraded() {
            warn!("Generated report is missing sections, using placeholders");
        }
        let sections = parsed.into_sections();

        log.info("Generating new HTML report.");
        let payload = ReportPayload {
            hook: sections.hook,
            summary: sections.summary,
            analysis: sections.analysis,
            debug_log: log.as_str().to_string(),
            stats_snippet: stats_snippet.to_string(),
        };

        match self.publisher.publish(&payload).await {
            Ok(report_id) => {
                info!("Report generated: {}", report_id);
                state.last_report_time = Some(self.clock.now());
                TickOutcome::Published {
                    difference,
                    report_id,
                }
            }
            Err(e) => {
                error!("Failed to publish report: {}", e);
                TickOutcome::PublishFailed {
                    difference,
                    error: e.to_string(),
                }
            }
        }
    }

    fn record_output(&self, output: &str) {
        if let Err(e) = self.store.record_llm_output(output) {
            warn!("Failed to record LLM output: {}", e);
        }
    }
}

impl std::fmt::Debug for HeadlinePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlinePipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use headliner_core::{CoinStat, HeadlinerError, LlmRequest, NewsItem};
    use headliner_feeds::FeedError;
    use headliner_llm::{CachedLlmClient, MemoryResponseCache};
    use parking_lot::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::clock::manual::ManualClock;
    use crate::report_store::MemoryReportStore;

    pub(crate) struct FakeFeed {
        pub stats: Mutex<Vec<CoinStat>>,
        pub news: Mutex<Vec<NewsItem>>,
        pub calls: AtomicUsize,
        pub fail: bool,
    }

    impl FakeFeed {
        pub fn new(stats: Vec<CoinStat>, news: Vec<NewsItem>) -> Arc<Self> {
            Arc::new(Self {
                stats: Mutex::new(stats),
                news: Mutex::new(news),
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                stats: Mutex::new(vec![]),
                news: Mutex::new(vec![]),
                calls: AtomicUsize::new(0),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl MarketFeed for FakeFeed {
        async fn fetch_stats(&self) -> Result<Vec<CoinStat>, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FeedError::NetworkError("connection refused".to_string()));
            }
            Ok(self.stats.lock().clone())
        }

        async fn fetch_news(&self) -> Result<Vec<NewsItem>, FeedError> {
            Ok(self.news.lock().clone())
        }
    }

    /// Answers by request kind and records which kinds were asked for
    pub(crate) struct ScriptedLlm {
        pub title: Mutex<String>,
        pub score: Mutex<String>,
        pub report: Mutex<String>,
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedLlm {
        pub fn new(title: &str, score: &str, report: &str) -> Arc<Self> {
            Arc::new(Self {
                title: Mutex::new(title.to_string()),
                score: Mutex::new(score.to_string()),
                report: Mutex::new(report.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, request: &LlmRequest) -> Result<String, HeadlinerError> {
            let kind = if request.temperature == prompts::SCORING_TEMPERATURE {
                "score"
            } else if request.max_tokens == prompts::TITLE_SUMMARY_MAX_TOKENS {
                "title"
            } else {
                "report"
            };
            self.calls.lock().push(kind);

            let reply = match kind {
                "score" => self.score.lock().clone(),
                "title" => self.title.lock().clone(),
                _ => self.report.lock().clone(),
            };
            Ok(reply)
        }
    }

    pub(crate) struct RecordingPublisher {
        pub published: Mutex<Vec<ReportPayload>>,
        pub fail: bool,
    }

    impl RecordingPublisher {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                published: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                published: Mutex::new(Vec::new()),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl ReportPublisher for RecordingPublisher {
        async fn publish(&self, payload: &ReportPayload) -> Result<String, HeadlinerError> {
            if self.fail {
                return Err(HeadlinerError::internal("disk full"));
            }
            let mut published = self.published.lock();
            published.push(payload.clone());
            Ok(format!("report-{}", published.len()))
        }
    }

    pub(crate) fn coin(symbol: &str, rank: u32, change_24h: f64) -> CoinStat {
        CoinStat {
            symbol: Some(symbol.to_string()),
            name: Some(symbol.to_uppercase()),
            rank: Some(rank),
            price: Some(100.0),
            change_1h: Some(0.1),
            change_4h: Some(0.5),
            change_24h: Some(change_24h),
            change_7d: Some(3.0),
        }
    }

    pub(crate) fn article(title: &str, ticker: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            headline: format!("{} headline", title),
            tickers: vec![ticker.to_string()],
        }
    }

    const REPORT: &str = "Bitcoin Steadies\n\nMarkets calm.\n\nAnalysis one.\n\nAnalysis two.";

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn quick_config() -> PipelineConfig {
        PipelineConfig {
            cooldown: Duration::ZERO,
            ..Default::default()
        }
    }

    struct Harness {
        feed: Arc<FakeFeed>,
        llm: Arc<ScriptedLlm>,
        store: Arc<MemoryReportStore>,
        publisher: Arc<RecordingPublisher>,
        clock: Arc<ManualClock>,
        pipeline: HeadlinePipeline,
    }

    fn harness_with(
        config: PipelineConfig,
        feed: Arc<FakeFeed>,
        llm: Arc<ScriptedLlm>,
        store: Arc<MemoryReportStore>,
        publisher: Arc<RecordingPublisher>,
    ) -> Harness {
        let clock = Arc::new(ManualClock::new(start()));
        let pipeline = HeadlinePipeline::new(
            config,
            feed.clone(),
            llm.clone(),
            store.clone(),
            publisher.clone(),
        )
        .with_clock(clock.clone());

        Harness {
            feed,
            llm,
            store,
            publisher,
            clock,
            pipeline,
        }
    }

    fn harness(config: PipelineConfig) -> Harness {
        harness_with(
            config,
            FakeFeed::new(
                vec![coin("btc", 1, 2.0), coin("eth", 2, 1.0)],
                vec![article("ETF inflows", "BTC"), article("Unrelated", "XYZ")],
            ),
            ScriptedLlm::new("Bitcoin Steadies\n\nMarkets calm.", "0.2", REPORT),
            Arc::new(MemoryReportStore::new()),
            RecordingPublisher::new(),
        )
    }

    #[tokio::test]
    async fn test_first_tick_publishes_full_report() {
        let h = harness(quick_config());

        let (state, outcome) = h.pipeline.tick(PipelineState::default()).await;

        assert_eq!(
            outcome,
            TickOutcome::Published {
                difference: 1.0,
                report_id: "report-1".to_string()
            }
        );
        // No previous text, so no scoring call
        assert_eq!(h.llm.calls(), vec!["title", "report"]);
        assert_eq!(state.last_report_time, Some(start()));
        assert!(!state.is_first_run);

        let published = h.publisher.published.lock();
        assert_eq!(published[0].hook, "Bitcoin Steadies");
        assert_eq!(published[0].summary, "Markets calm.");
        assert_eq!(published[0].analysis, "Analysis one.\n\nAnalysis two.");
        assert!(published[0].debug_log.contains("[INFO] Generating new HTML report."));
        assert!(published[0].stats_snippet.starts_with("Top by Rank:"));

        let saved = h.store.current().unwrap();
        assert_eq!(saved.title_summary.as_deref(), Some("Bitcoin Steadies\n\nMarkets calm."));
        assert_eq!(saved.content.as_deref(), Some(REPORT));
        assert_eq!(saved.stats.unwrap().len(), 2);
        // Only news mentioning a top coin is kept
        assert_eq!(saved.news.unwrap(), vec![article("ETF inflows", "BTC")]);
        assert_eq!(h.store.llm_outputs().len(), 2);
    }

    #[tokio::test]
    async fn test_cooldown_blocks_fetch_and_llm() {
        let h = harness(PipelineConfig::default());

        let (state, _) = h.pipeline.tick(PipelineState::default()).await;
        let feed_calls = h.feed.calls.load(Ordering::SeqCst);
        let llm_calls = h.llm.calls().len();

        h.clock.advance(TimeDelta::minutes(30));
        let (state, outcome) = h.pipeline.tick(state).await;
        assert_eq!(outcome, TickOutcome::CoolingDown { remaining_minutes: 30 });
        assert_eq!(h.feed.calls.load(Ordering::SeqCst), feed_calls);
        assert_eq!(h.llm.calls().len(), llm_calls);

        h.clock.advance(TimeDelta::seconds(29 * 60 + 30));
        let (state, outcome) = h.pipeline.tick(state).await;
        assert_eq!(outcome, TickOutcome::CoolingDown { remaining_minutes: 1 });

        h.clock.advance(TimeDelta::seconds(30));
        let (_, outcome) = h.pipeline.tick(state).await;
        assert_ne!(outcome, TickOutcome::CoolingDown { remaining_minutes: 0 });
        assert_eq!(h.feed.calls.load(Ordering::SeqCst), feed_calls + 1);
    }

    #[tokio::test]
    async fn test_unchanged_data_skips_llm_but_persists() {
        let h = harness(quick_config());
        let (state, _) = h.pipeline.tick(PipelineState::default()).await;
        let llm_calls = h.llm.calls().len();

        h.clock.advance(TimeDelta::minutes(15));
        let (_, outcome) = h.pipeline.tick(state).await;

        assert_eq!(outcome, TickOutcome::Unchanged);
        assert_eq!(h.llm.calls().len(), llm_calls);

        let saved = h.store.current().unwrap();
        assert_eq!(saved.timestamp, start() + TimeDelta::minutes(15));
        assert_eq!(saved.content.as_deref(), Some(REPORT));
    }

    #[tokio::test]
    async fn test_small_difference_stops_after_summary() {
        let h = harness(quick_config());
        let (state, _) = h.pipeline.tick(PipelineState::default()).await;

        h.feed.stats.lock()[0].change_24h = Some(4.0);
        *h.llm.title.lock() = "Bitcoin Edges Up\n\nMarkets calm.".to_string();
        *h.llm.score.lock() = "0.3".to_string();

        let (state, outcome) = h.pipeline.tick(state).await;
        assert_eq!(outcome, TickOutcome::SummaryOnly { difference: 0.3 });
        assert_eq!(h.llm.calls(), vec!["title", "report", "title", "score"]);
        assert_eq!(state.last_report_time, Some(start()));

        let saved = h.store.current().unwrap();
        assert_eq!(saved.title_summary.as_deref(), Some("Bitcoin Edges Up\n\nMarkets calm."));
        // Full report text carries forward from the last full generation
        assert_eq!(saved.content.as_deref(), Some(REPORT));
        assert_eq!(saved.stats.unwrap()[0].change_24h, Some(4.0));
    }

    #[tokio::test]
    async fn test_unparseable_score_compared_against_threshold() {
        for (threshold, expect_publish) in [(0.55, false), (0.5, true)] {
            let h = harness(PipelineConfig {
                diff_threshold: threshold,
                ..quick_config()
            });
            let (state, _) = h.pipeline.tick(PipelineState::default()).await;

            h.feed.news.lock().push(article("Exchange hack", "ETH"));
            *h.llm.title.lock() = "Hack Rattles Traders\n\nSummary.".to_string();
            *h.llm.score.lock() = "abc".to_string();

            let (_, outcome) = h.pipeline.tick(state).await;
            if expect_publish {
                assert!(matches!(outcome, TickOutcome::Published { difference, .. } if difference == 0.5));
            } else {
                assert_eq!(outcome, TickOutcome::SummaryOnly { difference: 0.5 });
            }
        }
    }

    #[tokio::test]
    async fn test_force_report_applies_to_first_tick_only() {
        let store = Arc::new(MemoryReportStore::new());
        let stats = vec![coin("btc", 1, 2.0)];
        let news = vec![article("ETF inflows", "BTC")];
        store
            .save(&ReportState {
                timestamp: start() - TimeDelta::hours(1),
                title_summary: Some("Bitcoin Steadies\n\nMarkets calm.".to_string()),
                content: None,
                stats: Some(stats.clone()),
                news: Some(news.clone()),
            })
            .unwrap();

        let h = harness_with(
            PipelineConfig {
                force_report: true,
                ..quick_config()
            },
            FakeFeed::new(stats, news),
            ScriptedLlm::new("Bitcoin Steadies\n\nMarkets calm.", "0.0", REPORT),
            store,
            RecordingPublisher::new(),
        );

        let (state, outcome) = h.pipeline.tick(PipelineState::default()).await;
        // Same text as before scores 0.0 but the force flag still publishes
        assert!(matches!(outcome, TickOutcome::Published { difference, .. } if difference == 0.0));
        assert_eq!(h.llm.calls(), vec!["title", "report"]);

        let (_, outcome) = h.pipeline.tick(state).await;
        assert_eq!(outcome, TickOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_always_run_bypasses_gate() {
        let h = harness(PipelineConfig {
            always_run: true,
            ..quick_config()
        });
        let (state, _) = h.pipeline.tick(PipelineState::default()).await;
        let (_, outcome) = h.pipeline.tick(state).await;

        // Identical title text short-circuits to 0.0 without a scoring call
        assert_eq!(outcome, TickOutcome::SummaryOnly { difference: 0.0 });
        assert_eq!(h.llm.calls(), vec!["title", "report", "title"]);
    }

    #[tokio::test]
    async fn test_identical_input_served_from_cache() {
        let llm = ScriptedLlm::new("Bitcoin Steadies\n\nMarkets calm.", "0.2", REPORT);
        let cached = Arc::new(CachedLlmClient::new(
            llm.clone(),
            Arc::new(MemoryResponseCache::new(100)),
        ));
        let clock = Arc::new(ManualClock::new(start()));
        let pipeline = HeadlinePipeline::new(
            PipelineConfig {
                always_run: true,
                ..quick_config()
            },
            FakeFeed::new(vec![coin("btc", 1, 2.0)], vec![article("ETF inflows", "BTC")]),
            cached,
            Arc::new(MemoryReportStore::new()),
            RecordingPublisher::new(),
        )
        .with_clock(clock);

        let (state, _) = pipeline.tick(PipelineState::default()).await;
        let (_, outcome) = pipeline.tick(state).await;

        assert_eq!(outcome, TickOutcome::SummaryOnly { difference: 0.0 });
        assert_eq!(llm.calls(), vec!["title", "report"]);
    }

    #[tokio::test]
    async fn test_publish_failure_persists_without_cooldown() {
        let h = harness_with(
            PipelineConfig::default(),
            FakeFeed::new(vec![coin("btc", 1, 2.0)], vec![]),
            ScriptedLlm::new("Title\n\nSummary", "0.9", REPORT),
            Arc::new(MemoryReportStore::new()),
            RecordingPublisher::failing(),
        );

        let (state, outcome) = h.pipeline.tick(PipelineState::default()).await;
        assert!(matches!(outcome, TickOutcome::PublishFailed { difference, .. } if difference == 1.0));
        assert_eq!(state.last_report_time, None);
        assert!(!state.is_first_run);
        assert_eq!(h.store.current().unwrap().content.as_deref(), Some(REPORT));
        assert!(h.publisher.published.lock().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_contained() {
        let h = harness_with(
            quick_config(),
            FakeFeed::failing(),
            ScriptedLlm::new("t", "0", REPORT),
            Arc::new(MemoryReportStore::new()),
            RecordingPublisher::new(),
        );

        let (state, outcome) = h.pipeline.tick(PipelineState::default()).await;
        assert!(matches!(outcome, TickOutcome::Failed { ref error } if error.contains("connection refused")));
        assert!(state.is_first_run);
        assert!(h.store.current().is_none());
        assert!(h.llm.calls().is_empty());
    }

    #[test]
    fn test_debug_log_format() {
        let mut log = DebugLog::default();
        log.debug("Fetched stats data, length: 3");
        log.info("Top Rank: BTC");
        assert_eq!(log.as_str(), "[DEBUG] Fetched stats data, length: 3\n[INFO] Top Rank: BTC\n");
    }
}
