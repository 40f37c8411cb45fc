//! Batch processing of many `.mrk` files
//!
//! Inputs are expanded (directories discovered, duplicates dropped), then
//! each file is loaded and parsed either on this thread or across a small
//! set of worker threads. Parallel outcomes are merged back in input
//! order, so the final result is the same either way.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::runtime::BatchPreferences;
use crate::file_processor::{FileProcessor, FileProcessorError, MRK_EXTENSION};
use crate::logging::{codes, Code};
use crate::pipeline::{self, ParseResult};
use crate::symbols::SourceParseContext;
use crate::syntax::{ParseOptions, SourceOutcome};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub parallel: bool,
}

impl BatchConfig {
    pub fn from_preferences(prefs: &BatchPreferences) -> Self {
        Self {
            max_threads: prefs.max_threads.clamp(1, MAX_WORKER_THREADS),
            recursive: prefs.recursive,
            parallel: prefs.parallel,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from_preferences(&BatchPreferences::default())
    }
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub result: ParseResult,
    /// Files that could not be loaded, in input order
    pub failed_files: Vec<(PathBuf, FileProcessorError)>,
    pub files_discovered: usize,
    pub processing_duration: Duration,
}

impl BatchResults {
    pub fn files_parsed(&self) -> usize {
        self.result.contexts.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_files.is_empty() || self.result.has_errors()
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} files, {} parsed, {} unreadable, {} parse errors, {:.2}s total",
            self.files_discovered,
            self.files_parsed(),
            self.failed_files.len(),
            self.result.errors.len(),
            self.processing_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Too many files found: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("IO error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Worker thread error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            BatchError::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            BatchError::TooManyFiles { .. } => codes::batch::BATCH_TOO_LARGE,
            BatchError::IoError { .. } => codes::batch::DISCOVERY_FAILED,
            BatchError::ThreadError { .. } => codes::batch::WORKER_FAILURE,
        }
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

fn is_mrk_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(MRK_EXTENSION))
            .unwrap_or(false)
}

fn visit_directory(dir_path: &Path, files: &mut Vec<PathBuf>, recursive: bool) -> Result<(), BatchError> {
    let entries = fs::read_dir(dir_path).map_err(|e| BatchError::IoError {
        error: format!("{}: {}", dir_path.display(), e),
    })?;

    for entry in entries {
        let path = entry
            .map_err(|e| BatchError::IoError {
                error: e.to_string(),
            })?
            .path();

        if path.is_dir() {
            if recursive {
                visit_directory(&path, files, recursive)?;
            }
        } else if is_mrk_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// `.mrk` files under `dir_path`, sorted for a stable processing order
pub fn discover_mrk_files(dir_path: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        let error = BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        };
        crate::log_error!(error.error_code(), "Directory not found", "path" => dir_path.display());
        return Err(error);
    }

    let mut files = Vec::new();
    visit_directory(dir_path, &mut files, config.recursive)?;
    files.sort();

    crate::log_debug!("File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

/// Expand command-line style inputs: files are kept as given, directories
/// are discovered in place. Repeated paths are dropped.
pub fn collect_inputs(inputs: &[PathBuf], config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(discover_mrk_files(input, config)?);
        } else {
            files.push(input.clone());
        }
    }

    let mut seen = HashSet::new();
    files.retain(|path| seen.insert(path.clone()));

    if files.len() > MAX_FILES_PER_BATCH {
        let error = BatchError::TooManyFiles {
            count: files.len(),
            max: MAX_FILES_PER_BATCH,
        };
        crate::log_error!(error.error_code(), "Too many files in batch",
            "count" => files.len(),
            "max" => MAX_FILES_PER_BATCH
        );
        return Err(error);
    }

    Ok(files)
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

type FileOutcome = Result<SourceOutcome, FileProcessorError>;

fn load_and_parse(
    file_path: &Path,
    file_id: usize,
    processor: &FileProcessor,
    options: &ParseOptions,
) -> FileOutcome {
    let loaded = processor.process_file(&file_path.display().to_string())?;
    let context = SourceParseContext::new(loaded.source.filename.clone());
    Ok(pipeline::parse_one(&loaded.source, context, options, file_id))
}

/// Load and parse `files`, sequentially or in parallel per `config`
pub fn process_files(
    files: &[PathBuf],
    config: &BatchConfig,
    processor: &FileProcessor,
    options: &ParseOptions,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();

    crate::log_info!("Starting batch processing",
        "files" => files.len(),
        "parallel" => config.parallel,
        "threads" => config.max_threads
    );

    let outcomes = if config.parallel && config.max_threads > 1 && files.len() > 1 {
        process_parallel(files, config.max_threads, processor, options)?
    } else {
        files
            .iter()
            .enumerate()
            .map(|(file_id, path)| load_and_parse(path, file_id, processor, options))
            .collect()
    };

    let mut results = BatchResults {
        files_discovered: files.len(),
        ..Default::default()
    };
    for (path, outcome) in files.iter().zip(outcomes) {
        match outcome {
            Ok(outcome) => results.result.absorb(outcome),
            Err(error) => results.failed_files.push((path.clone(), error)),
        }
    }
    results.processing_duration = start_time.elapsed();

    crate::log_success!(codes::success::BATCH_COMPLETE, "Batch processing completed",
        "files" => results.files_discovered,
        "parsed" => results.files_parsed(),
        "unreadable" => results.failed_files.len(),
        "errors" => results.result.errors.len(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

/// Striped work split: worker `t` takes files `t, t + n, t + 2n, ...`.
/// Outcomes are returned in input order.
fn process_parallel(
    files: &[PathBuf],
    max_threads: usize,
    processor: &FileProcessor,
    options: &ParseOptions,
) -> Result<Vec<FileOutcome>, BatchError> {
    let thread_count = max_threads.min(files.len());
    let collected: Arc<Mutex<Vec<(usize, FileOutcome)>>> =
        Arc::new(Mutex::new(Vec::with_capacity(files.len())));

    let mut handles = Vec::with_capacity(thread_count);
    for thread_id in 0..thread_count {
        let work: Vec<(usize, PathBuf)> = files
            .iter()
            .enumerate()
            .skip(thread_id)
            .step_by(thread_count)
            .map(|(file_id, path)| (file_id, path.clone()))
            .collect();
        let collected = Arc::clone(&collected);
        let processor = processor.clone();
        let options = options.clone();

        handles.push(thread::spawn(move || {
            for (file_id, path) in work {
                let outcome = load_and_parse(&path, file_id, &processor, &options);
                collected
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push((file_id, outcome));
            }
        }));
    }

    for handle in handles {
        handle.join().map_err(|_| {
            let error = BatchError::ThreadError {
                message: "Worker panicked during processing".to_string(),
            };
            crate::log_error!(error.error_code(), "Worker thread failed");
            error
        })?;
    }

    let mut outcomes = Arc::try_unwrap(collected)
        .map_err(|_| BatchError::ThreadError {
            message: "Failed to collect worker results".to_string(),
        })?
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    outcomes.sort_by_key(|(file_id, _)| *file_id);
    Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::quiet_options;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn config(parallel: bool, recursive: bool) -> BatchConfig {
        BatchConfig {
            max_threads: 3,
            recursive,
            parallel,
        }
    }

    fn write_tree(root: &Path) {
        fs::write(root.join("a.mrk"), "i mrk; c A { m int f { } }").unwrap();
        fs::write(root.join("b.mrk"), "c B { } oops").unwrap();
        fs::write(root.join("c.mrk"), "c C { c D { } }").unwrap();
        fs::write(root.join("readme.txt"), "not a source").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("d.mrk"), "c E { }").unwrap();
    }

    #[test]
    fn test_discovery_respects_recursion() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());

        let flat = discover_mrk_files(dir.path(), &config(false, false)).unwrap();
        assert_eq!(flat.len(), 3);
        assert!(flat.windows(2).all(|w| w[0] < w[1]));

        let deep = discover_mrk_files(dir.path(), &config(false, true)).unwrap();
        assert_eq!(deep.len(), 4);
    }

    #[test]
    fn test_missing_directory() {
        let result = discover_mrk_files(Path::new("no/such/dir"), &config(false, false));
        assert_matches!(result, Err(BatchError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_collect_inputs_drops_duplicates() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());
        let a = dir.path().join("a.mrk");

        let files = collect_inputs(&[a.clone(), dir.path().to_path_buf()], &config(false, false)).unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(files[0], a);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());
        let files = collect_inputs(&[dir.path().to_path_buf()], &config(false, true)).unwrap();
        let processor = FileProcessor::new().with_mrk_extension_required(true);

        let sequential = process_files(&files, &config(false, true), &processor, &quiet_options()).unwrap();
        let parallel = process_files(&files, &config(true, true), &processor, &quiet_options()).unwrap();

        assert_eq!(sequential.result.contexts, parallel.result.contexts);
        assert_eq!(sequential.result.errors, parallel.result.errors);
        assert_eq!(parallel.files_parsed(), 4);
        assert_eq!(parallel.result.class_count(), 5);
        assert_eq!(parallel.result.errors.len(), 1);
        assert!(parallel.result.errors[0].source_name.ends_with("b.mrk"));
        assert!(parallel.has_failures());
    }

    #[test]
    fn test_unreadable_file_is_reported_not_fatal() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());
        let files = vec![dir.path().join("missing.mrk"), dir.path().join("a.mrk")];

        let results = process_files(&files, &config(true, false), &FileProcessor::new(), &quiet_options()).unwrap();
        assert_eq!(results.failed_files.len(), 1);
        assert_matches!(results.failed_files[0].1, FileProcessorError::FileNotFound { .. });
        assert_eq!(results.files_parsed(), 1);
        assert!(results.summary().contains("1 unreadable"));
    }

    #[test]
    fn test_thread_count_is_clamped() {
        let prefs = BatchPreferences {
            parallel: true,
            recursive: false,
            max_threads: usize::MAX,
        };
        assert_eq!(BatchConfig::from_preferences(&prefs).max_threads, MAX_WORKER_THREADS);
    }
}
