//! Pipeline tunables

use std::time::Duration;

use headliner_core::HeadlinerError;
use headliner_llm::DEFAULT_MODEL;

/// Longest accepted check interval
const MAX_CHECK_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Configuration for the headline pipeline and its scheduler
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// How often the scheduler fires a tick
    pub check_interval: Duration,
    /// Quiet period after a published report
    pub cooldown: Duration,
    /// Minimum semantic difference (0.0 - 1.0) to run the full analysis
    pub diff_threshold: f64,
    /// Percentage-point move in any change window that counts as significant
    pub stats_change_threshold: f64,
    /// Coins taken from each ranking and compared by the change detector
    pub top_n: usize,
    /// Decimal places for percentages in prompts
    pub price_precision: usize,
    /// Model used for every LLM call
    pub model: String,
    /// Generate a full report on the first tick regardless of the gates
    pub force_report: bool,
    /// Skip the change gate on every tick
    pub always_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(15 * 60),
            cooldown: Duration::from_secs(60 * 60),
            diff_threshold: 0.55,
            stats_change_threshold: 1.0,
            top_n: 7,
            price_precision: 1,
            model: DEFAULT_MODEL.to_string(),
            force_report: false,
            always_run: false,
        }
    }
}

impl PipelineConfig {
    /// Reject values that would make the pipeline misbehave silently
    pub fn validate(&self) -> Result<(), HeadlinerError> {
        if !(0.0..=1.0).contains(&self.diff_threshold) {
            return Err(HeadlinerError::config(format!(
                "diff threshold must be within [0, 1], got {}",
                self.diff_threshold
            )));
        }
        if !self.stats_change_threshold.is_finite() || self.stats_change_threshold < 0.0 {
            return Err(HeadlinerError::config(format!(
                "stats change threshold must be a non-negative number, got {}",
                self.stats_change_threshold
            )));
        }
        if self.check_interval.is_zero() {
            return Err(HeadlinerError::config("check interval must be greater than zero"));
        }
        if self.check_interval > MAX_CHECK_INTERVAL {
            return Err(HeadlinerError::config(format!(
                "check interval must be at most {} minutes, got {}",
                MAX_CHECK_INTERVAL.as_secs() / 60,
                self.check_interval.as_secs() / 60
            )));
        }
        if self.top_n == 0 {
            return Err(HeadlinerError::config("top-N must be at least 1"));
        }
        if self.model.trim().is_empty() {
            return Err(HeadlinerError::config("model name must not be empty"));
        }
        Ok(())
    }
}
