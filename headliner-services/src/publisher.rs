//! Report rendering and delivery

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use headliner_core::{HeadlinerError, ReportPayload};
use tracing::info;

/// Delivers a finished report somewhere and returns an identifier for it
#[async_trait]
pub trait ReportPublisher: Send + Sync {
    async fn publish(&self, payload: &ReportPayload) -> Result<String, HeadlinerError>;
}

/// Writes each report as a standalone HTML file
#[derive(Debug, Clone)]
pub struct HtmlFilePublisher {
    output_dir: PathBuf,
}

impl HtmlFilePublisher {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// `YYYY-MM-DD-HH-<slug>.html`
    pub fn file_name(hook: &str, at: DateTime<Utc>) -> String {
        let slug = slugify(hook);
        let slug = if slug.is_empty() { "report".to_string() } else { slug };
        format!("{}-{}.html", at.format("%Y-%m-%d-%H"), slug)
    }
}

#[async_trait]
impl ReportPublisher for HtmlFilePublisher {
    async fn publish(&self, payload: &ReportPayload) -> Result<String, HeadlinerError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let file_name = Self::file_name(&payload.hook, Utc::now());
        let path = self.output_dir.join(&file_name);
        tokio::fs::write(&path, render_html(payload)).await?;

        info!("Report written to {}", path.display());
        Ok(file_name)
    }
}

/// Longest slug kept in a file name; whole words are kept where possible
const MAX_SLUG_LEN: usize = 80;

/// Lower-case ASCII alphanumerics joined by single dashes, at most `MAX_SLUG_LEN` bytes
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        // Slug is pure ASCII, so any byte index is a char boundary
        let cut = slug[..=MAX_SLUG_LEN].rfind('-').unwrap_or(MAX_SLUG_LEN);
        slug.truncate(cut);
    }

    slug
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn paragraphs_html(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("    <p>{}</p>", escape_html(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_html(payload: &ReportPayload) -> String {
    let hook = escape_html(&payload.hook);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{hook}</title>
</head>
<body>
  <h1>{hook}</h1>
  <section>
    <h2>Summary</h2>
{summary}
  </section>
  <section>
    <h2>Detailed Analysis</h2>
{analysis}
  </section>
  <section>
    <h2>Market Data</h2>
    <pre>{stats}</pre>
  </section>
  <section>
    <h2>Debug Logs</h2>
    <pre>{debug}</pre>
  </section>
</body>
</html>
"#,
        hook = hook,
        summary = paragraphs_html(&payload.summary),
        analysis = paragraphs_html(&payload.analysis),
        stats = escape_html(&payload.stats_snippet),
        debug = escape_html(&payload.debug_log),
    )
}
