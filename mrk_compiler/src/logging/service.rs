//! Logging service and logger backends
//!
//! [`LoggingService`] owns the level filter; backends only decide where an
//! event goes. The stderr backends keep stdout free for reports.

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level-filtering front for a [`Logger`]
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Backend chosen from the console/structured preferences
    pub fn with_config() -> Self {
        let logger: Arc<dyn Logger> = match (
            config::use_console_logging(),
            config::use_structured_logging(),
        ) {
            (false, _) => Arc::new(NullLogger),
            (true, true) => Arc::new(StructuredLogger),
            (true, false) => Arc::new(ConsoleLogger),
        };
        Self::new(logger, config::get_min_log_level())
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, code: Code, message: &str) {
        self.log_event(LogEvent::error(code, message));
    }

    pub fn log_success(&self, code: Code, message: &str) {
        self.log_event(LogEvent::success(code, message));
    }

    pub fn log_warning(&self, message: &str) {
        self.log_event(LogEvent::warning(message));
    }
}

pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

/// `[LEVEL] CODE - message` lines on stderr
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        eprintln!("{}", event.format());
    }
}

/// JSON lines on stderr
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        let line = event.format_json().unwrap_or_else(|_| event.format());
        eprintln!("{}", line);
    }
}

pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Keeps the most recent `LOG_BUFFER_SIZE` events
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<VecDeque<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn buffer(&self) -> MutexGuard<'_, VecDeque<LogEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.buffer().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.buffer().clear();
    }

    pub fn event_count(&self) -> usize {
        self.buffer().len()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.buffer().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn has_event_with_code(&self, code: Code) -> bool {
        self.buffer().iter().any(|e| e.code == code)
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let capacity = config::get_error_buffer_size();
        let mut events = self.buffer();
        while events.len() >= capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_service_filters_by_level() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Warning);

        service.log_error(codes::syntax::UNEXPECTED_SYMBOL, "Unexpected symbol");
        service.log_warning("Suspicious literal");
        service.log_success(codes::success::SOURCE_PARSED, "Parsed");
        service.log_event(LogEvent::debug("noise"));

        assert_eq!(memory.event_count(), 2);
        assert_eq!(memory.get_errors().len(), 1);
        assert!(memory.has_event_with_code(codes::syntax::UNEXPECTED_SYMBOL));
        assert!(!memory.has_event_with_code(codes::success::SOURCE_PARSED));
    }

    #[test]
    fn test_memory_logger_is_bounded() {
        let memory = MemoryLogger::new();
        let limit = config::get_error_buffer_size();
        for i in 0..limit + 5 {
            memory.log(&LogEvent::info(&format!("event {}", i)));
        }

        let events = memory.get_events();
        assert_eq!(events.len(), limit);
        assert_eq!(events[0].message, "event 5");

        memory.clear();
        assert_eq!(memory.event_count(), 0);
    }
}
