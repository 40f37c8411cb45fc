//! Reads `.mrk` sources from disk under the compile-time size limits
//!
//! Loading runs in a fixed order: the path must name a regular file, the
//! extension is checked when required, the size is checked against
//! `MAX_FILE_SIZE`, then the bytes are decoded as UTF-8. The first failing
//! step is logged and returned.

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::{codes, Code};
use crate::utils::Source;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const MRK_EXTENSION: &str = "mrk";

#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("no such file: {path}")]
    FileNotFound { path: String },

    #[error("expected a .{} file, got extension {extension:?}", MRK_EXTENSION)]
    InvalidExtension { extension: Option<String> },

    #[error("source is {size} bytes, limit is {max_size}")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("source is not valid UTF-8: {path}")]
    InvalidEncoding { path: String },

    #[error("i/o failure: {message}")]
    IoError { message: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> Code {
        use codes::file_processing::*;
        match self {
            Self::FileNotFound { .. } => FILE_NOT_FOUND,
            Self::InvalidExtension { .. } => INVALID_EXTENSION,
            Self::FileTooLarge { .. } => FILE_TOO_LARGE,
            Self::InvalidEncoding { .. } => INVALID_ENCODING,
            Self::IoError { .. } => IO_ERROR,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    fn io(action: &str, file: &str, err: io::Error) -> Self {
        Self::IoError {
            message: format!("{} '{}': {}", action, file, err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased, without the dot
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_mrk_file: bool,
}

impl FileMetadata {
    /// `512 B`, `2.00 KB`, `1.50 MB`
    pub fn human_readable_size(&self) -> String {
        let units = ["KB", "MB", "GB"];
        let mut scaled = self.size as f64;
        let mut unit = "B";
        for next in units {
            if scaled < 1024.0 {
                break;
            }
            scaled /= 1024.0;
            unit = next;
        }
        if unit == "B" {
            format!("{} B", self.size)
        } else {
            format!("{:.2} {}", scaled, unit)
        }
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

/// A loaded source and what was learned about its file
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    /// Named by the path as given, so reports echo the user's input
    pub source: Source,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub require_mrk_extension: bool,
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_mrk_extension: prefs.require_mrk_extension,
        }
    }

    pub fn with_mrk_extension_required(self, required: bool) -> Self {
        Self {
            require_mrk_extension: required,
        }
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    pub fn process_file(&self, file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
        let started = Instant::now();
        log_debug!("Loading source", "file" => file_path);

        let loaded = self.load(file_path).map_err(|error| {
            log_error!(error.error_code(), "Failed to load source",
                "file" => file_path,
                "reason" => &error
            );
            error
        })?;

        let (text, mut metadata) = loaded;
        metadata.line_count = text.lines().count();
        let result = FileProcessingResult {
            source: Source::new(file_path, text),
            metadata,
            processing_duration: started.elapsed(),
        };

        log_success!(codes::success::FILE_PROCESSING_SUCCESS, "Source loaded",
            "file" => file_path,
            "size" => result.metadata.human_readable_size(),
            "lines" => result.metadata.line_count,
            "large" => result.metadata.is_large_file(),
            "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0)
        );

        Ok(result)
    }

    fn load(&self, file_path: &str) -> Result<(String, FileMetadata), FileProcessorError> {
        let metadata = self.inspect(file_path)?;

        if self.require_mrk_extension && !metadata.is_mrk_file {
            return Err(FileProcessorError::InvalidExtension {
                extension: metadata.extension,
            });
        }
        if metadata.size > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            });
        }

        let bytes = fs::read(&metadata.path)
            .map_err(|e| FileProcessorError::io("reading", file_path, e))?;
        let text = String::from_utf8(bytes).map_err(|_| FileProcessorError::InvalidEncoding {
            path: file_path.to_owned(),
        })?;

        Ok((text, metadata))
    }

    /// Resolve `file_path` to a regular file and stat it
    fn inspect(&self, file_path: &str) -> Result<FileMetadata, FileProcessorError> {
        let given = Path::new(file_path);
        if file_path.is_empty() || !given.is_file() {
            return Err(FileProcessorError::FileNotFound {
                path: file_path.to_owned(),
            });
        }

        let path = given
            .canonicalize()
            .map_err(|e| FileProcessorError::io("resolving", file_path, e))?;
        let size = fs::metadata(&path)
            .map_err(|e| FileProcessorError::io("inspecting", file_path, e))?
            .len();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        Ok(FileMetadata {
            is_mrk_file: extension.as_deref() == Some(MRK_EXTENSION),
            path,
            size,
            extension,
            line_count: 0,
        })
    }
}

/// Load with default preferences
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_reads_mrk_source() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("int.mrk");
        fs::write(&file_path, "i mrk;\nc Int32 { }\n").unwrap();
        let path_str = file_path.to_str().unwrap();

        let result = FileProcessor::new()
            .with_mrk_extension_required(true)
            .process_file(path_str)
            .unwrap();

        assert_eq!(result.source.filename, path_str);
        assert_eq!(result.source.text, "i mrk;\nc Int32 { }\n");
        assert_eq!(result.metadata.line_count, 2);
        assert!(result.metadata.is_mrk_file);
        assert!(!result.metadata.is_large_file());
    }

    #[test]
    fn test_missing_file() {
        let result = process_file("definitely/not/here.mrk");
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        let result = process_file(dir.path().to_str().unwrap());
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_extension_enforcement() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("notes.txt");
        fs::write(&file_path, "c A { }").unwrap();
        let path_str = file_path.to_str().unwrap();

        let strict = FileProcessor::new().with_mrk_extension_required(true);
        assert_matches!(
            strict.process_file(path_str),
            Err(FileProcessorError::InvalidExtension { extension: Some(ref e) }) if e == "txt"
        );

        let lenient = FileProcessor::new().with_mrk_extension_required(false);
        assert!(lenient.process_file(path_str).is_ok());
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.mrk");
        fs::write(&file_path, [0x63, 0x20, 0xff, 0xfe]).unwrap();

        let error = process_file(file_path.to_str().unwrap()).unwrap_err();
        assert_matches!(error, FileProcessorError::InvalidEncoding { .. });
        assert_eq!(error.error_code(), codes::file_processing::INVALID_ENCODING);
        assert!(error.requires_halt());
    }

    #[test]
    fn test_human_readable_size() {
        let sized = |size| FileMetadata {
            path: PathBuf::from("a.mrk"),
            size,
            extension: Some("mrk".to_string()),
            line_count: 0,
            is_mrk_file: true,
        };
        assert_eq!(sized(512).human_readable_size(), "512 B");
        assert_eq!(sized(2048).human_readable_size(), "2.00 KB");
        assert_eq!(sized(3 * 1024 * 1024 / 2).human_readable_size(), "1.50 MB");
    }
}
