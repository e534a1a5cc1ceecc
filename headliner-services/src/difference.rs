//! Semantic distance between two title/summary texts

use std::sync::Arc;

use headliner_core::HeadlinerError;
use headliner_llm::{prompts, LlmClient};
use tracing::{debug, warn};

/// Score used when the model answers with something that is not a number
pub const FALLBACK_DIFFERENCE: f64 = 0.5;

/// Scores how different a new headline is from the previous one (0 = same, 1 = unrelated)
pub struct DifferenceScorer {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl DifferenceScorer {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Never calls the model for a missing or byte-identical previous text
    pub async fn score(&self, previous: Option<&str>, current: &str) -> Result<f64, HeadlinerError> {
        let Some(previous) = previous else {
            return Ok(1.0);
        };
        if previous == current {
            return Ok(0.0);
        }

        let request = prompts::difference_request(&self.model, previous, current);
        let response = self.llm.complete(&request).await?;
        let difference = parse_difference(&response);
        debug!("Difference response {:?} scored as {}", response.trim(), difference);
        Ok(difference)
    }
}

/// Parse a bare number, clamped into [0, 1]
pub fn parse_difference(response: &str) -> f64 {
    match response.trim().parse::<f64>() {
        Ok(value) if !value.is_nan() => value.clamp(0.0, 1.0),
        _ => {
            warn!("Unparseable difference score {:?}, using {}", response, FALLBACK_DIFFERENCE);
            FALLBACK_DIFFERENCE
        }
    }
}
