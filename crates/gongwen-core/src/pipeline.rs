//! End-to-end formatting
//!
//! Load → classify → rebuild → signature → footer → save → verify.

use std::path::{Path, PathBuf};

use gongwen_ooxml::{DocxPackage, DocxWriter};
use tracing::info;

use crate::error::{FormatError, Result};
use crate::footer::{inject_page_numbers, FooterOutcome};
use crate::rebuild::{append_signature, rebuild, DEFAULT_ORGANIZATION};
use crate::style::StyleTable;
use crate::verify::{verify_page_numbers, Verification};

/// Suffix appended to the input stem to name the formatted output
pub const OUTPUT_SUFFIX: &str = "_格式化";

/// Runtime options for one formatting run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Signature line appended after the content
    pub organization: String,
    /// Reopen the output and check its footers after saving
    pub verify: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            organization: DEFAULT_ORGANIZATION.to_string(),
            verify: true,
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatReport {
    /// Content paragraphs written, excluding the signature
    pub paragraphs: usize,
    pub sections: usize,
    pub footer: FooterOutcome,
    /// `None` when verification was disabled
    pub verification: Option<Verification>,
}

/// Default output file name for an input: `<stem>_格式化.docx`
///
/// The name carries no directory, so the output lands in the working
/// directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{}{}.docx", stem, OUTPUT_SUFFIX))
}

/// Build the formatted document for an opened package
///
/// Returns the writer, the number of content paragraphs and the footer mode.
pub fn build_document(
    package: &DocxPackage,
    organization: &str,
    table: &StyleTable,
) -> (DocxWriter, usize, FooterOutcome) {
    let mut writer = rebuild(package.paragraphs().iter().map(|p| p.text.as_str()), table);
    let paragraphs = writer.paragraphs().count();
    append_signature(&mut writer, organization, table);
    let footer = inject_page_numbers(&mut writer, &table.footer);
    (writer, paragraphs, footer)
}

/// Format `input` into a new document at `output`
///
/// Fails before writing anything if the input does not exist or cannot be
/// read. Verification problems are logged and reported but never fail the
/// run.
pub fn format_document(
    input: &Path,
    output: &Path,
    options: &FormatOptions,
    table: &StyleTable,
) -> Result<FormatReport> {
    if !input.exists() {
        return Err(FormatError::InputNotFound(input.to_path_buf()));
    }

    info!(input = %input.display(), "reading document");
    let package = DocxPackage::open(input).map_err(|source| FormatError::Load {
        path: input.to_path_buf(),
        source,
    })?;

    let (writer, paragraphs, footer) = build_document(&package, &options.organization, table);
    let sections = writer.sections().len();

    let bytes = writer.to_bytes().map_err(FormatError::Build)?;
    info!(output = %output.display(), bytes = bytes.len(), "saving document");
    std::fs::write(output, bytes).map_err(|err| FormatError::Save {
        path: output.to_path_buf(),
        source: err.into(),
    })?;

    let verification = options.verify.then(|| verify_page_numbers(output));
    info!(paragraphs, sections, ?footer, ?verification, "formatted document");

    Ok(FormatReport {
        paragraphs,
        sections,
        footer,
        verification,
    })
}
