//! Error types for the formatting pipeline

use std::path::PathBuf;

use gongwen_ooxml::OoxmlError;
use thiserror::Error;

/// Errors that can occur while formatting a document
#[derive(Error, Debug)]
pub enum FormatError {
    /// The input path does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input could not be opened or parsed as DOCX
    #[error("Failed to read document {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: OoxmlError,
    },

    /// The formatted package could not be written
    #[error("Failed to save document {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: OoxmlError,
    },

    /// The output package could not be assembled
    #[error("Failed to build output document")]
    Build(#[source] OoxmlError),
}

/// Result type for formatting operations
pub type Result<T> = std::result::Result<T, FormatError>;
