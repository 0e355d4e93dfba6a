//! Errors raised before any formatting starts

use std::path::PathBuf;

use thiserror::Error;

/// Environment and input errors of the command line
#[derive(Error, Debug)]
pub enum CliError {
    /// No input argument and nothing to offer in the directory
    #[error("No Word documents (.docx or .doc) found in {}", .0.display())]
    NoDocuments(PathBuf),

    /// The interactive answer is not a listed number
    #[error("Invalid selection: {0:?}")]
    InvalidSelection(String),

    /// The given input path does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Reading the selection from the terminal failed
    #[error("Failed to read selection: {0}")]
    Prompt(#[from] std::io::Error),
}
