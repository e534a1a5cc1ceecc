//! Headliner
//!
//! Watches crypto market stats and news, and publishes a narrative report
//! when conditions change enough to be worth one.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use headliner_feeds::{StereoticClient, DEFAULT_NEWS_URL, DEFAULT_STATS_URL};
use headliner_llm::{
    CachedLlmClient, FileResponseCache, OpenRouterClient, ResponseCache, DEFAULT_API_BASE,
    DEFAULT_CACHE_CAPACITY, DEFAULT_MODEL,
};
use headliner_services::{
    HeadlinePipeline, HtmlFilePublisher, JsonReportStore, PipelineConfig, Scheduler,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Generate a full report on the first tick even if nothing changed
    #[arg(long)]
    force_report: bool,

    /// Skip the change gate on every tick
    #[arg(long)]
    always_run: bool,

    #[arg(long, env = "CHECK_INTERVAL_MINUTES", default_value_t = 15)]
    check_interval_minutes: u64,

    /// Minutes to stay quiet after a published report
    #[arg(long, env = "COOLDOWN_MINUTES", default_value_t = 60)]
    cooldown_minutes: u64,

    /// Semantic difference (0-1) needed to generate the full report
    #[arg(long, env = "DIFF_THRESHOLD", default_value_t = 0.55)]
    diff_threshold: f64,

    /// Percentage-point move that counts as a significant stats change
    #[arg(long, env = "STATS_CHANGE_THRESHOLD", default_value_t = 1.0)]
    stats_change_threshold: f64,

    #[arg(long, env = "TOP_N", default_value_t = 7)]
    top_n: usize,

    #[arg(long, env = "PRICE_PRECISION", default_value_t = 1)]
    price_precision: usize,

    #[arg(long, env = "STATS_URL", default_value = DEFAULT_STATS_URL)]
    stats_url: String,

    #[arg(long, env = "NEWS_URL", default_value = DEFAULT_NEWS_URL)]
    news_url: String,

    /// OpenAI-compatible API base
    #[arg(long, env = "LLM_API_URL", default_value = DEFAULT_API_BASE)]
    llm_api_url: String,

    #[arg(long, env = "DEFAULT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value_t = 180)]
    llm_timeout_secs: u64,

    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    fetch_timeout_secs: u64,

    #[arg(long, env = "REPORT_STATE_PATH", default_value = "last_report.json")]
    report_state_path: PathBuf,

    #[arg(long, env = "PROMPT_CACHE_PATH", default_value = "data/promptCache.json")]
    prompt_cache_path: PathBuf,

    #[arg(long, env = "PROMPT_CACHE_CAPACITY", default_value_t = DEFAULT_CACHE_CAPACITY)]
    prompt_cache_capacity: usize,

    /// Append-only log of raw LLM output
    #[arg(long, env = "LLM_LOG_PATH", default_value = "llm_output_logs.txt")]
    llm_log_path: PathBuf,

    /// Directory the HTML reports are written to
    #[arg(long, env = "REPORT_DIR", default_value = "reports")]
    report_dir: PathBuf,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            check_interval: Duration::from_secs(self.check_interval_minutes.saturating_mul(60)),
            cooldown: Duration::from_secs(self.cooldown_minutes.saturating_mul(60)),
            diff_threshold: self.diff_threshold,
            stats_change_threshold: self.stats_change_threshold,
            top_n: self.top_n,
            price_precision: self.price_precision,
            model: self.model.clone(),
            force_report: self.force_report,
            always_run: self.always_run,
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine, everything has a default or comes from the real environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,headliner=debug")),
        )
        .init();

    let args = Args::parse();
    let config = args.pipeline_config();
    config.validate()?;

    info!("Starting Headliner");
    if config.force_report {
        info!("Force report enabled for the first run");
    }
    if config.always_run {
        info!("Always-run enabled, change gate is bypassed");
    }

    let feed = StereoticClient::with_timeout(Duration::from_secs(args.fetch_timeout_secs))?
        .with_urls(&args.stats_url, &args.news_url);

    let llm = OpenRouterClient::from_env(&args.llm_api_url)
        .context("LLM client is required")?
        .with_timeout(Duration::from_secs(args.llm_timeout_secs));
    info!("Using model {} via {}", config.model, args.llm_api_url);

    let cache: Arc<dyn ResponseCache> = Arc::new(FileResponseCache::open(
        &args.prompt_cache_path,
        args.prompt_cache_capacity,
    ));
    info!("Prompt cache holds {} entries", cache.len());

    let store = JsonReportStore::new(&args.report_state_path).with_llm_log(&args.llm_log_path);
    let publisher = HtmlFilePublisher::new(&args.report_dir);

    let pipeline = HeadlinePipeline::new(
        config,
        Arc::new(feed),
        Arc::new(CachedLlmClient::new(llm, cache)),
        Arc::new(store),
        Arc::new(publisher),
    );

    let scheduler = Scheduler::new(Arc::new(pipeline));
    scheduler.run(shutdown_signal()).await;

    info!("Headliner stopped");
    Ok(())
}
