//! Core types for the Headliner market narrative service
//!
//! This crate defines the shared data structures used across the workspace,
//! including market snapshots, news items, persisted report state and the
//! request shape sent to language models.

pub mod chat;
pub mod error;
pub mod market;
pub mod news;
pub mod report;

pub use chat::{ChatMessage, ChatRole, LlmRequest};
pub use error::{HeadlinerError, HeadlinerResult};
pub use market::{CoinStat, MarketSnapshot};
pub use news::NewsItem;
pub use report::{ReportPayload, ReportState};
