// RUNTIME PREFERENCES
//
// Every field defaults from an `MRK_*` environment variable. Hard limits
// are not here; see `compile_time`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use crate::logging::LogLevel;

/// `name` parsed as `T`, or `default` when unset or unparsable
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Treat spaces as token content instead of separators
    pub include_spaces: bool,
    pub collect_detailed_metrics: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            include_spaces: env_or(env_vars::LEXICAL_INCLUDE_SPACES, false),
            collect_detailed_metrics: env_or(env_vars::LEXICAL_DETAILED_METRICS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Mirror parse errors and declaration logs to the global logger
    pub forward_events_to_logger: bool,

    /// Add a warning log for every token with its error flag set
    pub warn_on_malformed_literals: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            forward_events_to_logger: env_or(env_vars::PARSER_FORWARD_EVENTS, true),
            warn_on_malformed_literals: env_or(env_vars::PARSER_WARN_MALFORMED_LITERALS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    pub require_mrk_extension: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_mrk_extension: env_or(env_vars::REQUIRE_MRK_EXTENSION, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchPreferences {
    pub parallel: bool,
    pub recursive: bool,

    /// Clamped to `MAX_WORKER_THREADS` when a batch is configured
    pub max_threads: usize,
}

impl Default for BatchPreferences {
    fn default() -> Self {
        Self {
            parallel: env_or(env_vars::BATCH_PARALLEL, false),
            recursive: env_or(env_vars::BATCH_RECURSIVE, false),
            max_threads: env_or(env_vars::BATCH_MAX_THREADS, 4),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// JSON lines instead of text on stderr
    pub use_structured_logging: bool,
    pub enable_console_logging: bool,
    /// Capped by the build's verbosity ceiling
    pub min_log_level: LogLevel,
    /// Tag events with the file the current thread is working on
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env_or(env_vars::LOGGING_MIN_LEVEL, LogLevel::Warning),
            include_file_context: env_or(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

/// Level from an environment variable or command-line value
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    level.parse().ok()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub parser: ParserPreferences,
    pub batch: BatchPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Keys missing from `text` keep their environment-derived defaults
    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Invalid runtime config: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&text)
    }
}

pub mod env_vars {
    pub const REQUIRE_MRK_EXTENSION: &str = "MRK_REQUIRE_MRK_EXTENSION";

    pub const LEXICAL_INCLUDE_SPACES: &str = "MRK_LEXICAL_INCLUDE_SPACES";
    pub const LEXICAL_DETAILED_METRICS: &str = "MRK_LEXICAL_DETAILED_METRICS";

    pub const PARSER_FORWARD_EVENTS: &str = "MRK_PARSER_FORWARD_EVENTS";
    pub const PARSER_WARN_MALFORMED_LITERALS: &str = "MRK_PARSER_WARN_MALFORMED_LITERALS";

    pub const BATCH_PARALLEL: &str = "MRK_BATCH_PARALLEL";
    pub const BATCH_RECURSIVE: &str = "MRK_BATCH_RECURSIVE";
    pub const BATCH_MAX_THREADS: &str = "MRK_BATCH_MAX_THREADS";

    pub const LOGGING_USE_STRUCTURED: &str = "MRK_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "MRK_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "MRK_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "MRK_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names_and_numbers() {
        let cases = [
            ("ERROR", Some(LogLevel::Error)),
            ("warn", Some(LogLevel::Warning)),
            ("Warning", Some(LogLevel::Warning)),
            ("2", Some(LogLevel::Info)),
            ("debug", Some(LogLevel::Debug)),
            ("verbose", None),
            ("4", None),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_log_level(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_unset_variable_falls_back() {
        assert_eq!(env_or("MRK_TEST_SURELY_UNSET_VARIABLE", 7usize), 7);
    }

    #[test]
    fn test_runtime_config_round_trips_through_json() {
        let config = RuntimeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.logging.min_log_level, config.logging.min_log_level);
        assert_eq!(back.batch.max_threads, config.batch.max_threads);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RuntimeConfig::from_toml_str(
            "[batch]\nparallel = true\nmax_threads = 2\n\n[logging]\nmin_log_level = \"DEBUG\"\n",
        )
        .unwrap();
        let defaults = RuntimeConfig::default();

        assert!(config.batch.parallel);
        assert_eq!(config.batch.max_threads, 2);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert_eq!(config.batch.recursive, defaults.batch.recursive);
        assert_eq!(
            config.file_processor.require_mrk_extension,
            defaults.file_processor.require_mrk_extension
        );
    }

    #[test]
    fn test_bad_toml_is_rejected() {
        assert!(RuntimeConfig::from_toml_str("[batch]\nparallel = \"often\"\n").is_err());
        assert!(RuntimeConfig::load(Path::new("no/such/mrk.toml")).is_err());
    }
}
