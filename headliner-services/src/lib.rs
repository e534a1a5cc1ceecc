//! Business logic for the Headliner service
//!
//! This crate turns raw market data into published reports: it detects
//! meaningful changes, runs the two-stage LLM pipeline, persists the
//! resulting state and schedules the whole thing on an interval.

pub mod change_detector;
pub mod clock;
pub mod config;
pub mod difference;
pub mod pipeline;
pub mod prompt_builder;
pub mod publisher;
pub mod report_parser;
pub mod report_store;
pub mod scheduler;

pub use change_detector::{ChangeAssessment, ChangeDetector};
pub use clock::{Clock, SystemClock};
pub use config::PipelineConfig;
pub use difference::DifferenceScorer;
pub use pipeline::{HeadlinePipeline, PipelineState, TickOutcome};
pub use prompt_builder::{PromptBuilder, PromptSet};
pub use publisher::{HtmlFilePublisher, ReportPublisher};
pub use report_parser::{parse_report, ParsedReport, ReportSections};
pub use report_store::{JsonReportStore, MemoryReportStore, ReportStore};
pub use scheduler::Scheduler;
