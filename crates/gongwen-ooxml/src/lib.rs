//! # gongwen-ooxml
//!
//! OOXML (Office Open XML) reading and writing for gongwen.
//!
//! This crate provides functionality to:
//! - Read the paragraph text, sections and footers of a DOCX file
//! - Build a fresh DOCX package with direct paragraph and run formatting
//! - Insert footer fields such as `PAGE`
//!
//! ## Example: Reading a Document
//!
//! ```no_run
//! use gongwen_ooxml::DocxPackage;
//!
//! let package = DocxPackage::open("document.docx")?;
//! for paragraph in package.paragraphs() {
//!     println!("{}", paragraph.text);
//! }
//! # Ok::<(), gongwen_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod document;
pub mod error;
pub mod package;
pub mod relationships;
pub mod units;
pub mod writer;
mod xml;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

pub use archive::OoxmlArchive;
pub use document::{Document, FooterReference, HeaderFooterKind, Paragraph, SectionProperties};
pub use error::{OoxmlError, Result};
pub use package::DocxPackage;
pub use relationships::Relationships;
pub use units::Length;
pub use writer::{
    Alignment, DocxWriter, FontFamily, Footer, LineSpacing, MutableParagraph, MutableRun,
    PageSetup, ParagraphProps, RunContent, RunProps, Section,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
