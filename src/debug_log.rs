//! Diagnostic channel.
//!
//! Records are appended as `[timestamp] label: {json}` lines when debugging
//! is enabled. Writing is best effort: I/O errors are dropped here and never
//! reach the hook pipeline.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::config::Config;

pub trait DebugLog: Send + Sync {
    fn record(&self, label: &str, data: Value);
}

/// Used when debugging is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLog;

impl DebugLog for NoopLog {
    fn record(&self, _label: &str, _data: Value) {}
}

/// Appends records to a file, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DebugLog for FileLog {
    fn record(&self, label: &str, data: Value) {
        if let Some(dir) = self.path.parent() {
            let _ = fs::create_dir_all(dir);
        }

        let line = format_record(&now_timestamp(), label, &data);
        if let Ok(mut file) = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            let _ = writeln!(file, "{line}");
        }
    }
}

/// Keeps records in memory, for inspecting what the pipeline reported.
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    records: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(String, Value)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.records().into_iter().map(|(label, _)| label).collect()
    }

    /// Data of the last record with `label`.
    pub fn find(&self, label: &str) -> Option<Value> {
        self.records()
            .into_iter()
            .rev()
            .find(|(l, _)| l == label)
            .map(|(_, data)| data)
    }
}

impl DebugLog for MemoryLog {
    fn record(&self, label: &str, data: Value) {
        if let Ok(mut records) = self.records.lock() {
            records.push((label.to_string(), data));
        }
    }
}

/// Pick the diagnostic channel for a configuration.
pub fn from_config(config: &Config) -> Arc<dyn DebugLog> {
    if config.debug {
        Arc::new(FileLog::new(config.debug_log_path()))
    } else {
        Arc::new(NoopLog)
    }
}

fn format_record(timestamp: &str, label: &str, data: &Value) -> String {
    let json = serde_json::to_string(data).unwrap_or_else(|_| "null".into());
    format!("[{timestamp}] {label}: {json}")
}

fn now_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.3f")
        .to_string()
}
