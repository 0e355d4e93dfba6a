//! gongwen CLI - Command-line interface library
//!
//! Formats a Word document to the official-document layout. With no input
//! argument the working directory is searched and a document is chosen
//! interactively.
//!
//! # Binary Usage
//!
//! ```bash
//! # Format a document, writing 通知_格式化.docx
//! gongwen 通知.docx
//!
//! # Explicit output and signature line
//! gongwen 通知.docx final.docx -o "某某市人民政府办公室"
//!
//! # Show the style table
//! gongwen --print-style-table
//! ```

pub mod app;
pub mod error;

// Re-export main entry point and types
pub use app::{discover_documents, format_command, report_error, run_cli, select_document};
pub use error::CliError;
