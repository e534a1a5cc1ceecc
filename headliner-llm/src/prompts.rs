//! Prompt templates for the two generation stages and the difference scorer

use headliner_core::{ChatMessage, LlmRequest};

/// Output budget for the title + summary stage
pub const TITLE_SUMMARY_MAX_TOKENS: u32 = 400;

/// Output budget for the full market analysis
pub const ANALYSIS_MAX_TOKENS: u32 = 2500;

/// Output budget for difference scoring; the answer is a bare number
pub const DIFFERENCE_MAX_TOKENS: u32 = 2500;

pub const GENERATION_TEMPERATURE: f32 = 1.0;

/// Scoring must be repeatable so cache hits stay meaningful
pub const SCORING_TEMPERATURE: f32 = 0.0;

const ANALYST_SYSTEM_PROMPT: &str = "You are a crypto analyst and commentator creating market summaries. \
Your style is catchy but not hyping. You are not a cheerleader, but a thoughtful analyst.";

const DIFFERENCE_SYSTEM_PROMPT: &str = "You are an AI that evaluates the semantic difference between two \
cryptocurrency market headlines. Return a number between 0 and 1 representing how different they are in \
meaning (0 = identical meaning, 1 = completely different meaning). Only return the number, nothing else.";

/// Stage 1: a catchy title and a single summary paragraph
pub fn title_summary_request(model: &str, stats_snippet: &str, news_snippet: &str) -> LlmRequest {
    let user_prompt = format!(
        r#"We have data on the top coins (by rank and by 4h change) and recent news.
Your task is to write a short market headline.
Select a catchy title and write it in the first line.
Then write a single summary paragraph, separated from the title by an empty line.
When you speak about a token, append change 24h info in the format " [TICKER, +0.0%]"
Focus on the most important events and price dynamics.
Coin stats, change24h change7d and other changes are in percent.

Output format scheme, beware of newlines:

[format scheme start]
A catchy title

Summary, a single paragraph
[format scheme end]

{}


Relevant news:
{}
"#,
        stats_snippet, news_snippet
    );

    LlmRequest::new(
        vec![
            ChatMessage::system(ANALYST_SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ],
        model,
    )
    .with_max_tokens(TITLE_SUMMARY_MAX_TOKENS)
    .with_temperature(GENERATION_TEMPERATURE)
}

/// Stage 2: full analysis that keeps the stage-1 title and summary
pub fn market_analysis_request(
    model: &str,
    stats_snippet: &str,
    news_snippet: &str,
    title_summary: &str,
) -> LlmRequest {
    let user_prompt = format!(
        r#"We have data on the top coins (by rank and by 4h change) and recent news.
Your task is to generate a detailed market analysis.
The title and summary are already written. Keep them exactly as they are as the first two paragraphs
and continue with the analysis:

{}

Then write 5-10 paragraphs. separate paragraphs with an empty line.
When you speak about a token, append change 24h info in the format " [TICKER, +0.0%]"
Include some info and thoughts from the most interesting news.
Make it very detailed but concise, order your topics by importancy of events and price dynamics.
If you find really interesting technical analysis, include it too.
Coin stats, change24h change7d and other changes are in percent, volumes are in the crypto itself.

Output format scheme, beware of newlines:

[format scheme start]
A catchy title

Summary, a single paragraph

Detailed analysis, single paragraph 1...

Detailed analysis, single paragraph 2...

...

Detailed analysis, last paragraph...

[format scheme end]

{}


Relevant news:
{}
"#,
        title_summary.trim(),
        stats_snippet,
        news_snippet
    );

    LlmRequest::new(
        vec![
            ChatMessage::system(ANALYST_SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ],
        model,
    )
    .with_max_tokens(ANALYSIS_MAX_TOKENS)
    .with_temperature(GENERATION_TEMPERATURE)
}

/// Ask for a bare 0..1 semantic distance between two headlines
pub fn difference_request(model: &str, previous: &str, current: &str) -> LlmRequest {
    let user_prompt = format!(
        "Evaluate how different these two crypto market headlines are semantically on a scale from 0 to 1:\n\n\
         Headline 1:\n{}\n\nHeadline 2:\n{}\n\nReturn only a number between 0 and 1.",
        previous, current
    );

    LlmRequest::new(
        vec![
            ChatMessage::system(DIFFERENCE_SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ],
        model,
    )
    .with_max_tokens(DIFFERENCE_MAX_TOKENS)
    .with_temperature(SCORING_TEMPERATURE)
}
