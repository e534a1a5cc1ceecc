//! Durable storage for the last evaluated report state
//!
//! State is a single JSON record rewritten in full on every save. A missing
//! or unreadable file is treated as "no previous report", which makes the
//! next tick behave like the very first one.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use headliner_core::{HeadlinerError, ReportState};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Persists `ReportState` between ticks and restarts
pub trait ReportStore: Send + Sync {
    fn load(&self) -> Result<Option<ReportState>, HeadlinerError>;

    fn save(&self, state: &ReportState) -> Result<(), HeadlinerError>;

    /// Keep a copy of raw LLM output for later inspection
    fn record_llm_output(&self, _output: &str) -> Result<(), HeadlinerError> {
        Ok(())
    }
}

/// `last_report.json`-style file store with an optional append-only output log
#[derive(Debug, Clone)]
pub struct JsonReportStore {
    path: PathBuf,
    llm_log_path: Option<PathBuf>,
}

impl JsonReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            llm_log_path: None,
        }
    }

    pub fn with_llm_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.llm_log_path = Some(path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn ensure_parent(path: &Path) -> Result<(), HeadlinerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

impl ReportStore for JsonReportStore {
    fn load(&self) -> Result<Option<ReportState>, HeadlinerError> {
        if !self.path.exists() {
            debug!("No previous report at {}", self.path.display());
            return Ok(None);
        }

        let data = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<ReportState>(&data) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(
                    "Ignoring unreadable report state at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn save(&self, state: &ReportState) -> Result<(), HeadlinerError> {
        ensure_parent(&self.path)?;

        let json = serde_json::to_string(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Saved report state to {}", self.path.display());
        Ok(())
    }

    fn record_llm_output(&self, output: &str) -> Result<(), HeadlinerError> {
        let Some(log_path) = &self.llm_log_path else {
            return Ok(());
        };
        ensure_parent(log_path)?;

        let entry = format!(
            "\n\n[{}]\n{}\n{}",
            Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            output,
            "=".repeat(80)
        );
        let mut file = OpenOptions::new().create(true).append(true).open(log_path)?;
        file.write_all(entry.as_bytes())?;
        Ok(())
    }
}

/// In-process store, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    state: Mutex<Option<ReportState>>,
    llm_outputs: Mutex<Vec<String>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ReportState> {
        self.state.lock().clone()
    }

    pub fn llm_outputs(&self) -> Vec<String> {
        self.llm_outputs.lock().clone()
    }
}

impl ReportStore for MemoryReportStore {
    fn load(&self) -> Result<Option<ReportState>, HeadlinerError> {
        Ok(self.state.lock().clone())
    }

    fn save(&self, state: &ReportState) -> Result<(), HeadlinerError> {
        *self.state.lock() = Some(state.clone());
        Ok(())
    }

    fn record_llm_output(&self, output: &str) -> Result<(), HeadlinerError> {
        self.llm_outputs.lock().push(output.to_string());
        Ok(())
    }
}
