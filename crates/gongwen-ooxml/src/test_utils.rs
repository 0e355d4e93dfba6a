//! Shared test utilities for gongwen crates
//!
//! Fixture builders that write DOCX packages by hand with `ZipWriter`, so
//! reader tests do not depend on the crate's own writer.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::archive::OoxmlArchive;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

/// Build a DOCX whose body is the given raw WordprocessingML fragment
///
/// # Example
/// ```ignore
/// use gongwen_ooxml::test_utils::create_docx_from_body;
/// let docx = create_docx_from_body("<w:p><w:r><w:t>正文</w:t></w:r></w:p>");
/// ```
pub fn create_docx_from_body(body: &str) -> Vec<u8> {
    create_package(body, &[])
}

/// Build a DOCX with one paragraph per entry; empty entries become `<w:p/>`
pub fn create_docx(paragraphs: &[&str]) -> Vec<u8> {
    create_docx_from_body(&paragraphs_xml(paragraphs))
}

/// Build a DOCX with one section per `footers` entry
///
/// Each `Some(text)` gives that section a default footer with one paragraph
/// of `text`; `None` leaves the section without a footer reference. All
/// `paragraphs` are placed in the last section.
pub fn create_docx_with_footers(paragraphs: &[&str], footers: &[Option<&str>]) -> Vec<u8> {
    let mut body = String::new();
    let mut parts = Vec::new();
    let last = footers.len().saturating_sub(1);

    for (i, footer) in footers.iter().enumerate() {
        let reference = match footer {
            Some(text) => {
                parts.push(*text);
                format!(
                    r#"<w:footerReference w:type="default" r:id="rId{}"/>"#,
                    parts.len()
                )
            }
            None => String::new(),
        };
        let sect_pr = format!(
            r#"<w:sectPr>{}<w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#,
            reference
        );
        if i == last {
            body.push_str(&paragraphs_xml(paragraphs));
            body.push_str(&sect_pr);
        } else {
            body.push_str(&format!("<w:p><w:pPr>{}</w:pPr></w:p>", sect_pr));
        }
    }

    create_package(&body, &parts)
}

/// Extract any file content from a DOCX byte array
pub fn extract_file(docx: &[u8], path: &str) -> Option<String> {
    let archive = OoxmlArchive::from_bytes(docx).unwrap();
    archive.get_string(path).unwrap()
}

/// Extract document.xml content from a DOCX byte array
pub fn extract_document_xml(docx: &[u8]) -> String {
    extract_file(docx, "word/document.xml").unwrap()
}

fn paragraphs_xml(paragraphs: &[&str]) -> String {
    paragraphs
        .iter()
        .map(|text| {
            if text.is_empty() {
                "<w:p/>".to_string()
            } else {
                format!(
                    r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                    escape(text)
                )
            }
        })
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn create_package(body: &str, footers: &[&str]) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(PACKAGE_RELS.as_bytes()).unwrap();

    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 1..=footers.len() {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer{}.xml"/>"#,
            i, i
        ));
    }
    rels.push_str("</Relationships>");
    zip.start_file("word/_rels/document.xml.rels", options)
        .unwrap();
    zip.write_all(rels.as_bytes()).unwrap();

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <w:body>{}</w:body>
</w:document>"#,
            body
        )
        .as_bytes(),
    )
    .unwrap();

    for (i, text) in footers.iter().enumerate() {
        zip.start_file(format!("word/footer{}.xml", i + 1), options)
            .unwrap();
        zip.write_all(
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:ftr>"#,
                escape(text)
            )
            .as_bytes(),
        )
        .unwrap();
    }

    zip.finish().unwrap();
    buffer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_docx() {
        let docx = create_docx(&["标题", ""]);
        let archive = OoxmlArchive::from_bytes(&docx).unwrap();

        assert!(archive.contains("[Content_Types].xml"));
        assert!(archive.contains("word/document.xml"));
        assert!(archive.contains("_rels/.rels"));

        let xml = extract_document_xml(&docx);
        assert!(xml.contains("标题"));
        assert!(xml.contains("<w:p/>"));
    }

    #[test]
    fn test_create_docx_with_footers() {
        let docx = create_docx_with_footers(&["正文"], &[Some("A"), None, Some("B")]);

        assert!(extract_file(&docx, "word/footer1.xml").unwrap().contains(">A<"));
        assert!(extract_file(&docx, "word/footer2.xml").unwrap().contains(">B<"));
        assert!(extract_file(&docx, "word/footer3.xml").is_none());
    }
}
