//! Footer page numbers
//!
//! Each section footer is replaced by one centred paragraph reading
//! `-{PAGE}-`, where the page number is a field the viewer evaluates. If the
//! field cannot be written, every footer falls back to a static `- N -`
//! literal with N the section index.

use gongwen_ooxml::{DocxWriter, OoxmlError};
use tracing::{debug, info, warn};

use crate::style::FooterStyle;

/// How the page numbers ended up in the footers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterOutcome {
    /// Every footer holds a page-number field
    Field,
    /// Every footer holds the static `- N -` literal
    Fallback,
}

/// Replace every section footer with a page number line
///
/// Field failures are recovered here and never propagate.
pub fn inject_page_numbers(writer: &mut DocxWriter, style: &FooterStyle) -> FooterOutcome {
    match write_field_footers(writer, style) {
        Ok(()) => {
            info!(sections = writer.sections().len(), "added page number fields");
            FooterOutcome::Field
        }
        Err(err) => {
            warn!(error = %err, "page number field failed, writing static footers");
            write_fallback_footers(writer, style);
            warn!("static footers number sections, not pages; a section longer than one page repeats its number");
            FooterOutcome::Fallback
        }
    }
}

fn write_field_footers(writer: &mut DocxWriter, style: &FooterStyle) -> Result<(), OoxmlError> {
    let props = style.run_props();
    for (index, section) in writer.sections_mut().iter_mut().enumerate() {
        let footer = section.footer_mut();
        footer.clear();

        let para = footer.add_paragraph();
        para.props.alignment = Some(style.alignment.into());
        para.add_run("-", props.clone());
        para.push_field(&style.field_instruction, props.clone())?;
        para.add_run("-", props.clone());
        debug!(section = index + 1, "page number field");
    }
    Ok(())
}

fn write_fallback_footers(writer: &mut DocxWriter, style: &FooterStyle) {
    let props = style.run_props();
    for (index, section) in writer.sections_mut().iter_mut().enumerate() {
        let footer = section.footer_mut();
        footer.clear();

        let para = footer.add_paragraph();
        para.props.alignment = Some(style.alignment.into());
        let literal = format!("- {} -", index + 1);
        debug!(section = index + 1, %literal, "static page number");
        para.add_run(literal, props.clone());
    }
}
