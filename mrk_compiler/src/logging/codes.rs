//! Error and success codes with their classification metadata
//!
//! Every code the compiler emits is declared here together with the
//! metadata that drives severity, halting and the suggested fix.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl serde::Serialize for Code {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        [Severity::Critical, Severity::High, Severity::Medium, Severity::Low]
            .into_iter()
            .find(|severity| severity.as_str() == name)
            .ok_or_else(|| format!("unknown severity '{}'", name))
    }
}

/// Classification of one code. Recoverable codes are reported and parsing
/// continues; the rest stop work on the current source.
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

const fn entry(
    code: &'static str,
    category: &'static str,
    severity: Severity,
    halts: bool,
    description: &'static str,
    recommended_action: &'static str,
) -> ErrorMetadata {
    ErrorMetadata {
        code,
        category,
        severity,
        recoverable: !halts,
        requires_halt: halts,
        description,
        recommended_action,
    }
}

const fn halting(
    code: &'static str,
    category: &'static str,
    severity: Severity,
    description: &'static str,
    action: &'static str,
) -> ErrorMetadata {
    entry(code, category, severity, true, description, action)
}

const fn recoverable(
    code: &'static str,
    category: &'static str,
    severity: Severity,
    description: &'static str,
    action: &'static str,
) -> ErrorMetadata {
    entry(code, category, severity, false, description, action)
}

const fn informational(code: &'static str, category: &'static str, description: &'static str) -> ErrorMetadata {
    entry(code, category, Severity::Low, false, description, "No action required")
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const INVALID_ENCODING: Code = Code::new("E008");
    pub const IO_ERROR: Code = Code::new("E010");
}

/// Lexical analysis codes
pub mod lexical {
    use super::Code;

    pub const TOO_MANY_TOKENS: Code = Code::new("E020");
    pub const MALFORMED_LITERAL: Code = Code::new("E021");
}

/// Declaration parsing error codes
pub mod syntax {
    use super::Code;

    pub const EXPECTED_IDENTIFIER: Code = Code::new("E040");
    pub const EXPECTED_SEMICOLON: Code = Code::new("E041");
    pub const UNEXPECTED_SYMBOL: Code = Code::new("E042");
    pub const EXPECTED_OPEN_BRACE: Code = Code::new("E043");
    pub const EXPECTED_CLOSE_BRACE: Code = Code::new("E044");
    pub const EXPECTED_TYPENAME_OR_IDENTIFIER: Code = Code::new("E045");
    pub const EXPECTED_TYPENAME: Code = Code::new("E046");
    pub const NO_CLASS_CONTEXT: Code = Code::new("E047");
}

/// Batch processing error codes
pub mod batch {
    use super::Code;

    pub const DIRECTORY_NOT_FOUND: Code = Code::new("E060");
    pub const BATCH_TOO_LARGE: Code = Code::new("E061");
    pub const DISCOVERY_FAILED: Code = Code::new("E062");
    pub const WORKER_FAILURE: Code = Code::new("E063");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const INCLUDE_REGISTERED: Code = Code::new("I040");
    pub const CLASS_REGISTERED: Code = Code::new("I041");
    pub const METHOD_REGISTERED: Code = Code::new("I042");
    pub const SOURCE_PARSED: Code = Code::new("I043");
    pub const BATCH_COMPLETE: Code = Code::new("I060");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static METADATA: &[ErrorMetadata] = &[
    // System
    halting("ERR001", "System", Severity::Critical,
        "Internal compiler error",
        "Report this issue with the input that triggered it"),
    halting("ERR002", "System", Severity::Critical,
        "System initialization failed",
        "Check configuration files and environment variables"),

    // File processing
    halting("E005", "FileProcessing", Severity::High,
        "Source file not found",
        "Verify the path exists and is a regular file"),
    halting("E006", "FileProcessing", Severity::Medium,
        "Source file does not have the .mrk extension",
        "Rename the file or pass a .mrk source"),
    halting("E007", "FileProcessing", Severity::High,
        "Source file exceeds the configured size limit",
        "Split the source into smaller files"),
    halting("E008", "FileProcessing", Severity::High,
        "Source file is not valid UTF-8",
        "Re-save the file with UTF-8 encoding"),
    halting("E010", "FileProcessing", Severity::High,
        "I/O error while reading source",
        "Check file permissions and disk health"),

    // Lexical analysis
    halting("E020", "LexicalAnalysis", Severity::High,
        "Token limit exceeded",
        "Split the source or raise max_token_count in the build profile"),
    recoverable("E021", "LexicalAnalysis", Severity::Low,
        "Malformed literal",
        "Check numeric ranges and escape sequences in the literal"),

    // Declaration parsing
    recoverable("E040", "SyntaxAnalysis", Severity::High,
        "Expected identifier",
        "Provide a name made of letters and underscores"),
    halting("E041", "SyntaxAnalysis", Severity::High,
        "Expected ';'",
        "Terminate the include path with a semicolon"),
    halting("E042", "SyntaxAnalysis", Severity::High,
        "Unexpected symbol",
        "Start each top-level statement with a declaration keyword"),
    recoverable("E043", "SyntaxAnalysis", Severity::Medium,
        "Expected '{'",
        "Open the declaration body or remove the stray closing brace"),
    recoverable("E044", "SyntaxAnalysis", Severity::Medium,
        "Expected '}'",
        "Close every opened body"),
    recoverable("E045", "SyntaxAnalysis", Severity::High,
        "Expected typename or identifier",
        "Follow 'm' with a return type and name, or '.' for a constructor"),
    recoverable("E046", "SyntaxAnalysis", Severity::High,
        "Expected typename",
        "Give the method a return type"),
    halting("E047", "SyntaxAnalysis", Severity::High,
        "No class context found",
        "Declare methods inside a class body"),

    // Batch processing
    halting("E060", "BatchProcessing", Severity::High,
        "Directory not found",
        "Verify the directory path"),
    halting("E061", "BatchProcessing", Severity::Medium,
        "Too many files in one batch",
        "Narrow the input or raise max_files_per_batch"),
    halting("E062", "BatchProcessing", Severity::High,
        "File discovery failed",
        "Check directory permissions"),
    halting("E063", "BatchProcessing", Severity::Critical,
        "Worker thread failed",
        "Retry sequentially and report the failing input"),

    // Success
    informational("I004", "System", "System initialization completed"),
    informational("I006", "FileProcessing", "File processed successfully"),
    informational("I020", "LexicalAnalysis", "Tokenization completed"),
    informational("I040", "SyntaxAnalysis", "Include registered"),
    informational("I041", "SyntaxAnalysis", "Class registered"),
    informational("I042", "SyntaxAnalysis", "Method registered"),
    informational("I043", "SyntaxAnalysis", "Source parsed"),
    informational("I060", "BatchProcessing", "Batch processing completed"),
];

static REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    REGISTRY.get_or_init(|| METADATA.iter().map(|meta| (meta.code, meta)).collect())
}

fn lookup<T>(code: &str, field: impl FnOnce(&ErrorMetadata) -> T, default: T) -> T {
    registry().get(code).map(|meta| field(meta)).unwrap_or(default)
}

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    registry().get(code).copied()
}

/// Unregistered codes are treated as `Medium`
pub fn get_severity(code: &str) -> Severity {
    lookup(code, |meta| meta.severity, Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    lookup(code, |meta| meta.recoverable, true)
}

pub fn requires_halt(code: &str) -> bool {
    lookup(code, |meta| meta.requires_halt, false)
}

pub fn get_description(code: &str) -> &'static str {
    lookup(code, |meta| meta.description, "Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    lookup(code, |meta| meta.recommended_action, "No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    lookup(code, |meta| meta.category, "Unknown")
}
