//! Global logging for the mrk compiler
//!
//! A process-wide [`LoggingService`] and [`ErrorCollector`] plus a
//! thread-local file context, so events logged from worker threads are
//! attributed to the file that thread is processing.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, NullLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = RefCell::new(None);
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Install the configured service and collector for this process
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("invalid logging limits: {}", e))?;

    // Every stage must have its codes registered before anything logs
    let unregistered: Vec<&str> = [
        codes::system::INTERNAL_ERROR,
        codes::file_processing::FILE_NOT_FOUND,
        codes::lexical::TOO_MANY_TOKENS,
        codes::syntax::EXPECTED_IDENTIFIER,
        codes::batch::DIRECTORY_NOT_FOUND,
    ]
    .iter()
    .map(Code::as_str)
    .filter(|code| codes::get_error_metadata(code).is_none())
    .collect();
    if !unregistered.is_empty() {
        return Err(format!("unregistered codes: {}", unregistered.join(", ")));
    }

    let service = Arc::new(service::create_configured_service());
    init_global_logging_with_service(Arc::clone(&service))?;
    service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Logging ready",
    ));

    Ok(())
}

/// Initialize with a custom service
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized".to_string())?;

    Ok(())
}

pub fn is_initialized() -> bool {
    try_get_global_logger().is_some() && try_get_global_error_collector().is_some()
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(Arc::as_ref)
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR.get().map(Arc::as_ref)
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    if let Some(collector) = try_get_global_error_collector() {
        collector.register_file(&file_path.display().to_string());
    }

    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(FileProcessingContext::new(file_path, file_id));
    });
}

pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Clears the thread's file context when dropped, including on unwind
struct FileContextGuard;

impl Drop for FileContextGuard {
    fn drop(&mut self) {
        clear_file_context();
    }
}

/// Run `f` with the file context set, clearing it afterwards
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let _guard = FileContextGuard;
    f()
}

pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|slot| slot.borrow().clone())
}

/// Tag an event with the current file unless it already names one
pub fn with_current_file(event: LogEvent) -> LogEvent {
    if !config::include_file_context() || event.context.contains_key("file") {
        return event;
    }
    match get_current_file_context() {
        Some(file_ctx) => event
            .with_context("file", &file_ctx.file_path.display().to_string())
            .with_context("file_id", &file_ctx.file_id.to_string()),
        None => event,
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn collect(event: &LogEvent) {
    let Some(collector) = try_get_global_error_collector() else {
        return;
    };
    let file = event
        .context
        .get("file")
        .cloned()
        .or_else(|| get_current_file_context().map(|c| c.file_path.display().to_string()));
    if let Some(file) = file {
        collector.record_event(&file, event.clone());
    }
}

/// Context pairs as built by the logging macros
pub type ContextPairs<'a> = Vec<(&'a str, String)>;

fn with_pairs(event: LogEvent, context: ContextPairs<'_>) -> LogEvent {
    context
        .into_iter()
        .fold(event, |event, (key, value)| event.with_context(key, &value))
}

fn emit(event: LogEvent) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(with_current_file(event));
    }
}

/// Whether `log_debug!` should build its event at all
pub fn debug_enabled() -> bool {
    config::get_min_log_level() >= LogLevel::Debug
}

/// Used by `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: ContextPairs<'_>,
) {
    let event = with_pairs(LogEvent::error(code, message), context);
    let event = match span {
        Some(span) => event.with_span(span),
        None => event,
    };
    forward_event(&event);
}

/// Used by `log_warning!`
pub fn log_warning_with_context(message: &str, context: ContextPairs<'_>) {
    forward_event(&with_pairs(LogEvent::warning(message), context));
}

pub fn log_success_with_context(code: Code, message: &str, context: ContextPairs<'_>) {
    emit(with_pairs(LogEvent::success(code, message), context));
}

pub fn log_info_with_context(message: &str, context: ContextPairs<'_>) {
    emit(with_pairs(LogEvent::info(message), context));
}

pub fn log_debug_with_context(message: &str, context: ContextPairs<'_>) {
    emit(with_pairs(LogEvent::debug(message), context));
}

/// Send an already-built event to the global logger; errors and warnings
/// are also recorded by the collector under their file
pub fn forward_event(event: &LogEvent) {
    let event = with_current_file(event.clone());

    if event.is_error() || event.is_warning() {
        collect(&event);
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

// ============================================================================
// BATCH SUMMARY
// ============================================================================

/// Totals over everything collected since logging was initialized
pub fn get_processing_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(ErrorCollector::get_summary)
        .unwrap_or_default()
}

/// Log an error even before `init_global_logging`, via plain stderr
pub fn safe_log_error(code: Code, message: &str) {
    match try_get_global_logger() {
        Some(logger) => logger.log_event(LogEvent::error(code, message)),
        None => eprintln!("error[{}]: {} (logging not initialized)", code, message),
    }
}
