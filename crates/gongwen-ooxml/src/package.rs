//! Read access to an existing DOCX package
//!
//! Locates the main document part through the package relationships,
//! parses it, and resolves each section's footer part.

use std::path::Path;

use tracing::debug;

use crate::archive::{OoxmlArchive, PACKAGE_RELS_PATH};
use crate::document::{parse_footer, Document, Paragraph, SectionProperties};
use crate::error::{OoxmlError, Result};
use crate::relationships::{rels_path_for, resolve_target, Relationships};

/// Conventional location of the main document part
const DEFAULT_DOCUMENT_PATH: &str = "word/document.xml";

/// An opened DOCX package
#[derive(Debug)]
pub struct DocxPackage {
    archive: OoxmlArchive,
    document_path: String,
    document: Document,
    document_rels: Relationships,
}

impl DocxPackage {
    /// Open and parse a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(OoxmlArchive::open(path)?)
    }

    /// Parse a DOCX package held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_bytes(bytes)?)
    }

    /// Parse an already unpacked archive
    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        let document_path = match archive.get(PACKAGE_RELS_PATH) {
            Some(xml) => Relationships::parse(xml)?
                .find_by_type(Relationships::TYPE_OFFICE_DOCUMENT)
                .map(|target| resolve_target("", target))
                .unwrap_or_else(|| DEFAULT_DOCUMENT_PATH.to_string()),
            None => DEFAULT_DOCUMENT_PATH.to_string(),
        };

        let document = Document::parse(archive.require(&document_path)?)?;
        let document_rels = match archive.get(&rels_path_for(&document_path)) {
            Some(xml) => Relationships::parse(xml)?,
            None => Relationships::new(),
        };

        debug!(
            part = %document_path,
            paragraphs = document.paragraphs.len(),
            sections = document.sections.len(),
            "opened package"
        );

        Ok(Self {
            archive,
            document_path,
            document,
            document_rels,
        })
    }

    /// Top-level body paragraphs
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.document.paragraphs
    }

    /// Section properties; a document without any `w:sectPr` still has one
    /// implicit section
    pub fn sections(&self) -> Vec<SectionProperties> {
        if self.document.sections.is_empty() {
            vec![SectionProperties::default()]
        } else {
            self.document.sections.clone()
        }
    }

    /// Default footer paragraphs of every section, in section order
    ///
    /// A section without its own default footer reference shows the footer
    /// of the previous section, as Word does; `None` means no footer at all.
    pub fn section_footers(&self) -> Result<Vec<Option<Vec<Paragraph>>>> {
        let base_dir = self
            .document_path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("");

        let mut footers = Vec::new();
        let mut inherited: Option<Vec<Paragraph>> = None;
        for section in self.sections() {
            if let Some(rel_id) = section.default_footer() {
                let target = self.document_rels.get(rel_id).ok_or_else(|| {
                    OoxmlError::InvalidStructure(format!(
                        "footer relationship {} not found",
                        rel_id
                    ))
                })?;
                let part = resolve_target(base_dir, target);
                inherited = Some(parse_footer(self.archive.require(&part)?)?);
            }
            footers.push(inherited.clone());
        }
        Ok(footers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_docx, create_docx_from_body, create_docx_with_footers};

    #[test]
    fn test_open_paragraphs() {
        let bytes = create_docx(&["标题", "", "一、总则"]);
        let package = DocxPackage::from_bytes(&bytes).unwrap();

        let texts: Vec<&str> = package.paragraphs().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["标题", "", "一、总则"]);
        assert_eq!(package.sections().len(), 1);
    }

    #[test]
    fn test_tables_skipped_blank_paragraphs_kept() {
        let bytes = create_docx_from_body(
            r#"<w:p><w:r><w:t>标题</w:t></w:r></w:p>
               <w:p/>
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>表格内容</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
               <w:p><w:r><w:t>正文</w:t></w:r></w:p>
               <w:sectPr/>"#,
        );
        let package = DocxPackage::from_bytes(&bytes).unwrap();

        let texts: Vec<&str> = package.paragraphs().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["标题", "", "正文"]);
    }

    #[test]
    fn test_missing_document_part() {
        let mut archive = OoxmlArchive::new();
        archive.set_string("[Content_Types].xml", "<Types/>");

        let err = DocxPackage::from_archive(archive).unwrap_err();
        assert!(matches!(err, OoxmlError::MissingFile(_)));
    }

    #[test]
    fn test_section_footers_inherit_previous() {
        let bytes = create_docx_with_footers(&["正文"], &[Some("- 1 -"), None, Some("第三节")]);
        let package = DocxPackage::from_bytes(&bytes).unwrap();

        let footers = package.section_footers().unwrap();
        assert_eq!(footers.len(), 3);
        assert_eq!(footers[0].as_ref().unwrap()[0].text, "- 1 -");
        assert_eq!(footers[1].as_ref().unwrap()[0].text, "- 1 -");
        assert_eq!(footers[2].as_ref().unwrap()[0].text, "第三节");
    }

    #[test]
    fn test_no_footer() {
        let bytes = create_docx(&["正文"]);
        let package = DocxPackage::from_bytes(&bytes).unwrap();

        assert_eq!(package.section_footers().unwrap(), vec![None]);
    }
}
