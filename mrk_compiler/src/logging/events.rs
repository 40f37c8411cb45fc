//! Log events carried through the compiler and into parse results
//!
//! Events serialize directly through serde. Registry metadata (category,
//! severity, recommended action) is looked up from the code on demand
//! rather than stored on the event.

use super::codes::{self, Code};
use crate::utils::Span;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::str::FromStr;

/// Ordered from least to most verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    #[serde(rename = "ERROR")]
    Error = 0,
    #[serde(rename = "WARN")]
    Warning = 1,
    #[serde(rename = "INFO")]
    Info = 2,
    #[serde(rename = "DEBUG")]
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Accepts names (`warn`, `Warning`, ...) and the numeric levels 0-3
impl FromStr for LogLevel {
    type Err = String;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.to_ascii_lowercase().as_str() {
            "error" | "0" => Ok(LogLevel::Error),
            "warning" | "warn" | "1" => Ok(LogLevel::Warning),
            "info" | "2" => Ok(LogLevel::Info),
            "debug" | "3" => Ok(LogLevel::Debug),
            _ => Err(format!("unknown log level '{}'", level)),
        }
    }
}

/// One logged occurrence. Context keys iterate in sorted order.
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn at_level(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.to_owned(),
            span: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::at_level(LogLevel::Error, code, message)
    }

    /// Warning without a registered code
    pub fn warning(message: &str) -> Self {
        Self::at_level(LogLevel::Warning, Code::new("W000"), message)
    }

    pub fn warning_with_code(code: Code, message: &str) -> Self {
        Self::at_level(LogLevel::Warning, code, message)
    }

    pub fn info(message: &str) -> Self {
        Self::at_level(LogLevel::Info, Code::new("I000"), message)
    }

    pub fn info_with_code(code: Code, message: &str) -> Self {
        Self::at_level(LogLevel::Info, code, message)
    }

    /// Info-level event carrying a success code
    pub fn success(code: Code, message: &str) -> Self {
        Self::info_with_code(code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::at_level(LogLevel::Debug, Code::new("D000"), message)
    }

    pub fn debug_with_code(code: Code, message: &str) -> Self {
        Self::at_level(LogLevel::Debug, code, message)
    }

    pub fn with_span(self, span: Span) -> Self {
        Self {
            span: Some(span),
            ..self
        }
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.level, LogLevel::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.level, LogLevel::Warning)
    }

    pub fn is_info(&self) -> bool {
        matches!(self.level, LogLevel::Info)
    }

    pub fn is_debug(&self) -> bool {
        matches!(self.level, LogLevel::Debug)
    }

    // Registry lookups keyed by this event's code

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.code.as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.code.as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.code.as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.code.as_str())
    }

    /// `[LEVEL] CODE - message at line:col`
    pub fn format(&self) -> String {
        let mut line = format!("[{}] {} - {}", self.level.as_str(), self.code, self.message);
        if let Some(span) = &self.span {
            let _ = write!(line, " at {}", span.start());
        }
        line
    }

    /// [`format`](Self::format) followed by indented metadata and context lines
    pub fn format_detailed(&self) -> String {
        let mut out = self.format();
        let _ = write!(out, "\n  {} / {}", self.category(), self.severity());

        if self.is_error() {
            let _ = write!(
                out,
                "\n  recoverable={} halt={}",
                self.is_recoverable(),
                self.requires_halt()
            );
            if let Some(meta) = codes::get_error_metadata(self.code.as_str()) {
                let _ = write!(out, "\n  {}\n  help: {}", meta.description, meta.recommended_action);
            }
        }

        for (key, value) in &self.context {
            let _ = write!(out, "\n  {} = {}", key, value);
        }
        out
    }

    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
