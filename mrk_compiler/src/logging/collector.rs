//! Per-file event collection with cargo-style output
//!
//! The global collector gathers events logged while a file context is set.
//! [`format_cargo_style`] also renders parse results.

use super::events::LogEvent;
use crate::config::compile_time::logging::MAX_LOG_EVENTS_PER_FILE;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

// ============================================================================
// FILE PROCESSING CONTEXT
// ============================================================================

/// File currently being processed on this thread
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub failed_files: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

// ============================================================================
// ERROR COLLECTOR
// ============================================================================

/// Thread-safe event store keyed by file
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<String, Vec<LogEvent>>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Vec<LogEvent>>> {
        self.file_events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make a file visible in summaries even if it logs nothing
    pub fn register_file(&self, file: &str) {
        self.lock().entry(file.to_string()).or_default();
    }

    /// Record an event; past the per-file limit a single overflow warning
    /// is appended and further events are dropped
    pub fn record_event(&self, file: &str, event: LogEvent) {
        let mut events = self.lock();
        let file_events = events.entry(file.to_string()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn get_file_events(&self, file: &str) -> Vec<LogEvent> {
        self.lock().get(file).cloned().unwrap_or_default()
    }

    pub fn get_file_errors(&self, file: &str) -> Vec<LogEvent> {
        self.lock()
            .get(file)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = self.lock();
        let mut summary = ProcessingSummary {
            total_files: events.len(),
            ..Default::default()
        };

        for file_events in events.values() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();
            if errors > 0 {
                summary.failed_files += 1;
            }
            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        summary
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CARGO-STYLE FORMATTING
// ============================================================================

fn push_event(output: &mut String, label: &str, file: &str, event: &LogEvent, with_help: bool) {
    let span_info = event
        .span
        .as_ref()
        .map(|s| format!("\n  --> {}:{}", file, s.start()))
        .unwrap_or_default();

    output.push_str(&format!(
        "{}[{}]: {}{}\n",
        label,
        event.code.as_str(),
        event.message,
        span_info
    ));

    for (key, value) in &event.context {
        if key != "file" && key != "file_id" {
            output.push_str(&format!("   = {}: {}\n", key, value));
        }
    }

    if with_help {
        let action = event.recommended_action();
        if action != "No specific action available" {
            output.push_str(&format!("   = help: {}\n", action));
        }
    }
}

/// Render errors and warnings grouped by file, followed by totals
pub fn format_cargo_style(events_by_file: &BTreeMap<String, Vec<LogEvent>>) -> String {
    let mut output = String::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for (file, events) in events_by_file {
        let errors: Vec<&LogEvent> = events.iter().filter(|e| e.is_error()).collect();
        let warnings: Vec<&LogEvent> = events.iter().filter(|e| e.is_warning()).collect();
        if errors.is_empty() && warnings.is_empty() {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", file));
        for event in &errors {
            push_event(&mut output, "error", file, event, true);
        }
        for event in &warnings {
            push_event(&mut output, "warning", file, event, false);
        }
        output.push('\n');

        total_errors += errors.len();
        total_warnings += warnings.len();
    }

    if total_errors > 0 {
        output.push_str(&format!("Total errors: {}\n", total_errors));
    }
    if total_warnings > 0 {
        output.push_str(&format!("Total warnings: {}\n", total_warnings));
    }

    output
}
