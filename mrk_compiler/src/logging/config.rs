//! Logging configuration
//!
//! Combines the compile-time logging limits with the user's runtime
//! preferences. The build profile caps verbosity: a production build never
//! emits debug events even when asked to.

use crate::config::compile_time::logging::{
    LOG_BUFFER_SIZE, MAX_LOG_EVENTS_PER_FILE, MAX_LOG_VERBOSITY,
};
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

const BUFFER_SIZE_RANGE: std::ops::RangeInclusive<usize> = 100..=100_000;

static PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences. Fails once preferences have been set or
/// read, since readers see whichever value was first in place.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

fn preferences() -> &'static LoggingPreferences {
    PREFERENCES.get_or_init(LoggingPreferences::default)
}

// ============================================================================
// ACCESSORS
// ============================================================================

/// Most verbose level this build allows
pub fn get_verbosity_ceiling() -> LogLevel {
    [LogLevel::Error, LogLevel::Warning, LogLevel::Info]
        .get(MAX_LOG_VERBOSITY as usize)
        .copied()
        .unwrap_or(LogLevel::Debug)
}

/// User preference clamped to the build's verbosity ceiling
pub fn get_min_log_level() -> LogLevel {
    preferences().min_log_level.min(get_verbosity_ceiling())
}

pub fn use_structured_logging() -> bool {
    preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    preferences().enable_console_logging
}

pub fn include_file_context() -> bool {
    preferences().include_file_context
}

pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_events_per_file() -> usize {
    MAX_LOG_EVENTS_PER_FILE
}

/// Sanity checks on the generated limits
pub fn validate_config() -> Result<(), String> {
    if !BUFFER_SIZE_RANGE.contains(&LOG_BUFFER_SIZE) {
        return Err(format!(
            "Log buffer size {} outside {}..={}",
            LOG_BUFFER_SIZE,
            BUFFER_SIZE_RANGE.start(),
            BUFFER_SIZE_RANGE.end()
        ));
    }
    if MAX_LOG_EVENTS_PER_FILE > LOG_BUFFER_SIZE {
        return Err(format!(
            "Per-file event cap {} exceeds log buffer size {}",
            MAX_LOG_EVENTS_PER_FILE, LOG_BUFFER_SIZE
        ));
    }
    Ok(())
}

pub fn get_config_summary() -> String {
    let prefs = preferences();
    let output = if prefs.enable_console_logging {
        if prefs.use_structured_logging {
            "json"
        } else {
            "text"
        }
    } else {
        "off"
    };

    format!(
        "LOGGING:\n    \
         level: {} (requested {}, build allows up to {})\n    \
         output: {}, file context: {}\n    \
         buffer: {} events, {} per file",
        get_min_log_level().as_str(),
        prefs.min_log_level.as_str(),
        get_verbosity_ceiling().as_str(),
        output,
        if prefs.include_file_context { "on" } else { "off" },
        LOG_BUFFER_SIZE,
        MAX_LOG_EVENTS_PER_FILE,
    )
}
