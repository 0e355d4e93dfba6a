//! gongwen-core - official-document layout
//!
//! Classifies the paragraphs of a source document by their enumerator
//! tokens and rebuilds them under the fixed official-document style table,
//! with a signature line and footer page numbers.
//!
//! # Example
//!
//! ```
//! use gongwen_core::{classify, rebuild, Category, StyleTable};
//!
//! assert_eq!(classify("（三）具体措施"), Category::Level2);
//!
//! let table = StyleTable::official();
//! let writer = rebuild(["关于印发管理办法的通知", "", "一、总则"], &table);
//! assert_eq!(writer.paragraphs().count(), 2);
//! ```

pub mod classify;
pub mod error;
pub mod footer;
pub mod pipeline;
pub mod rebuild;
pub mod style;
pub mod verify;

// Re-export main types and functions
pub use classify::{classify, classify_paragraphs, Category, ClassifiedParagraph};
pub use error::{FormatError, Result};
pub use footer::{inject_page_numbers, FooterOutcome};
pub use pipeline::{
    build_document, default_output_path, format_document, FormatOptions, FormatReport,
    OUTPUT_SUFFIX,
};
pub use rebuild::{append_signature, rebuild, rebuild_classified, DEFAULT_ORGANIZATION};
pub use style::{Alignment, FooterStyle, PageGeometry, StyleRule, StyleTable};
pub use verify::{verify_page_numbers, Verification};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
