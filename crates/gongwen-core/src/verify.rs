//! Post-save page number check
//!
//! A smoke test only: the saved file is reopened and its section footers
//! are searched for a dash. It passes for both the field and the static
//! footer and says nothing about whether the field is well formed.

use std::path::Path;

use gongwen_ooxml::DocxPackage;
use tracing::warn;

/// Result of the page number check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Some footer paragraph contains a dash
    Present,
    /// No footer paragraph contains a dash
    Missing,
    /// The saved file could not be reopened
    Unreadable,
}

impl Verification {
    pub fn is_present(self) -> bool {
        self == Self::Present
    }
}

/// Reopen `path` and look for a dash in any section footer
pub fn verify_page_numbers(path: &Path) -> Verification {
    let footers = match DocxPackage::open(path).and_then(|package| package.section_footers()) {
        Ok(footers) => footers,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not reopen output for verification");
            return Verification::Unreadable;
        }
    };

    let found = footers
        .iter()
        .flatten()
        .flatten()
        .any(|paragraph| paragraph.text.contains('-'));
    if found {
        Verification::Present
    } else {
        warn!(path = %path.display(), "no page number found in any footer");
        Verification::Missing
    }
}
