//! Loading sources from disk

mod processor;

pub use processor::{
    process_file, FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError,
    MRK_EXTENSION,
};
