//! Splits a generated report into hook, summary and analysis

pub const DEFAULT_HOOK: &str = "Crypto Market Update";
pub const DEFAULT_SUMMARY: &str = "Summary not provided.";
pub const DEFAULT_ANALYSIS: &str = "Detailed analysis not provided.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSections {
    pub hook: String,
    pub summary: String,
    pub analysis: String,
}

/// A parsed report, tagged with whether placeholders had to be filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReport {
    Complete(ReportSections),
    Degraded(ReportSections),
}

impl ParsedReport {
    pub fn sections(&self) -> &ReportSections {
        match self {
            ParsedReport::Complete(s) | ParsedReport::Degraded(s) => s,
        }
    }

    pub fn into_sections(self) -> ReportSections {
        match self {
            ParsedReport::Complete(s) | ParsedReport::Degraded(s) => s,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ParsedReport::Degraded(_))
    }
}

/// Paragraph 1 is the hook, paragraph 2 the summary, the rest the analysis
///
/// Paragraphs are separated by blank lines; CRLF line endings and lines that
/// hold only whitespace count as blank.
pub fn parse_report(text: &str) -> ParsedReport {
    let paragraphs = split_paragraphs(text);
    let mut iter = paragraphs.into_iter();

    let hook = iter.next();
    let summary = iter.next();
    let rest: Vec<String> = iter.collect();
    let analysis = (!rest.is_empty()).then(|| rest.join("\n\n"));

    let degraded = hook.is_none() || summary.is_none() || analysis.is_none();
    let sections = ReportSections {
        hook: hook.unwrap_or_else(|| DEFAULT_HOOK.to_string()),
        summary: summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        analysis: analysis.unwrap_or_else(|| DEFAULT_ANALYSIS.to_string()),
    };

    if degraded {
        ParsedReport::Degraded(sections)
    } else {
        ParsedReport::Complete(sections)
    }
}

fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n").trim().to_string());
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n").trim().to_string());
    }

    paragraphs
}
