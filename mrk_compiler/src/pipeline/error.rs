use crate::file_processor::FileProcessorError;
use crate::logging::Code;

/// Failures that prevent a parse from starting.
///
/// Parse errors themselves never surface here; they are collected in the
/// [`super::ParseResult`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
        }
    }
}
