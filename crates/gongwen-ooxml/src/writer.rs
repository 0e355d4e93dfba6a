//! DOCX Writer
//!
//! Builds a fresh WordprocessingML package from an in-memory model:
//! sections with page setup, body paragraphs with direct formatting, and
//! one footer part per section that has a footer.
//!
//! # Example
//!
//! ```no_run
//! use gongwen_ooxml::writer::{Alignment, DocxWriter, RunProps};
//!
//! let mut writer = DocxWriter::new();
//! let para = writer.add_paragraph();
//! para.props.alignment = Some(Alignment::Center);
//! para.add_run("关于印发管理办法的通知", RunProps::default());
//! writer.save("output.docx")?;
//! # Ok::<(), gongwen_ooxml::OoxmlError>(())
//! ```

use std::path::Path;

use tracing::debug;

use crate::archive::{OoxmlArchive, CONTENT_TYPES_PATH, PACKAGE_RELS_PATH};
use crate::error::{OoxmlError, Result};
use crate::relationships::Relationships;
use crate::units::Length;
use crate::xml::{escape_xml, OFFICE_RELATIONSHIPS_NS, WORDPROCESSING_NS};

/// Minimal style part: document defaults and the Normal paragraph style
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:rFonts w:ascii="Times New Roman" w:eastAsia="宋体" w:hAnsi="Times New Roman" w:cs="Times New Roman"/><w:lang w:val="en-US" w:eastAsia="zh-CN" w:bidi="ar-SA"/></w:rPr></w:rPrDefault>
    <w:pPrDefault/>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
</w:styles>"#;

/// Paragraph alignment (`w:jc`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    /// Justified on both edges (`both`)
    Justify,
}

impl Alignment {
    /// Attribute value used in `w:jc/@w:val`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }
}

/// Line spacing rule (`w:spacing/@w:line`, `@w:lineRule`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSpacing {
    /// Exactly this line pitch
    Exact(Length),
}

/// Font family for a run
///
/// `ascii` fills the ASCII and high-ANSI slots; `east_asia`, when present,
/// fills the East Asian slot used for CJK text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFamily {
    pub ascii: String,
    pub east_asia: Option<String>,
}

/// Direct run formatting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProps {
    pub font: Option<FontFamily>,
    pub size: Option<Length>,
    pub bold: Option<bool>,
}

/// Direct paragraph formatting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProps {
    pub alignment: Option<Alignment>,
    pub spacing_after: Option<Length>,
    pub line_spacing: Option<LineSpacing>,
    pub first_line_indent: Option<Length>,
}

/// Content of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    /// Literal text; `\t` becomes a tab, `\n` and `\r` a line break
    Text(String),
    /// A field evaluated by the viewer (e.g. `PAGE`)
    Field(String),
}

/// A run under construction
#[derive(Debug, Clone, PartialEq)]
pub struct MutableRun {
    pub props: RunProps,
    pub content: RunContent,
}

/// A paragraph under construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutableParagraph {
    pub props: ParagraphProps,
    runs: Vec<MutableRun>,
}

impl MutableParagraph {
    /// Create an empty paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text run
    pub fn add_run(&mut self, text: impl Into<String>, props: RunProps) -> &mut MutableRun {
        self.runs.push(MutableRun {
            props,
            content: RunContent::Text(text.into()),
        });
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    /// Append a run holding a field such as `PAGE`
    ///
    /// The instruction must start with an ASCII field name and contain no
    /// control characters; anything else is refused with
    /// [`OoxmlError::InvalidField`] and the paragraph is left untouched.
    pub fn push_field(&mut self, instruction: &str, props: RunProps) -> Result<&mut MutableRun> {
        validate_field_instruction(instruction)?;
        self.runs.push(MutableRun {
            props,
            content: RunContent::Field(instruction.to_string()),
        });
        let last = self.runs.len() - 1;
        Ok(&mut self.runs[last])
    }

    /// Runs in order
    pub fn runs(&self) -> &[MutableRun] {
        &self.runs
    }

    /// Text of the literal runs (fields contribute nothing)
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .filter_map(|r| match &r.content {
                RunContent::Text(t) => Some(t.as_str()),
                RunContent::Field(_) => None,
            })
            .collect()
    }

    /// Whether any run is a field
    pub fn has_field(&self) -> bool {
        self.runs
            .iter()
            .any(|r| matches!(r.content, RunContent::Field(_)))
    }
}

/// Characters XML 1.0 cannot carry, even escaped
fn is_forbidden_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}

fn validate_text(paragraphs: &[MutableParagraph]) -> Result<()> {
    for run in paragraphs.iter().flat_map(|p| p.runs.iter()) {
        if let RunContent::Text(text) = &run.content {
            if text.chars().any(is_forbidden_xml_char) {
                return Err(OoxmlError::InvalidText(text.clone()));
            }
        }
    }
    Ok(())
}

fn validate_field_instruction(instruction: &str) -> Result<()> {
    let name = instruction.split_whitespace().next().unwrap_or("");
    let valid_name = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic());
    let has_control = instruction.chars().any(|c| c.is_control());
    if valid_name && !has_control {
        Ok(())
    } else {
        Err(OoxmlError::InvalidField(instruction.to_string()))
    }
}

/// Footer content of a section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Footer {
    paragraphs: Vec<MutableParagraph>,
}

impl Footer {
    /// Remove every paragraph
    pub fn clear(&mut self) {
        self.paragraphs.clear();
    }

    /// Append an empty paragraph and return it
    pub fn add_paragraph(&mut self) -> &mut MutableParagraph {
        self.paragraphs.push(MutableParagraph::new());
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    pub fn paragraphs(&self) -> &[MutableParagraph] {
        &self.paragraphs
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Page size and margins of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
    pub width: Length,
    pub height: Length,
    pub margin_top: Length,
    pub margin_bottom: Length,
    pub margin_left: Length,
    pub margin_right: Length,
    /// Distance of the header from the top edge
    pub header_distance: Length,
    /// Distance of the footer from the bottom edge
    pub footer_distance: Length,
}

impl Default for PageSetup {
    fn default() -> Self {
        // US Letter size: 8.5" x 11" with 1" margins
        Self {
            width: Length::from_twips(12240),
            height: Length::from_twips(15840),
            margin_top: Length::from_twips(1440),
            margin_bottom: Length::from_twips(1440),
            margin_left: Length::from_twips(1440),
            margin_right: Length::from_twips(1440),
            header_distance: Length::from_twips(720),
            footer_distance: Length::from_twips(720),
        }
    }
}

/// A section: page setup, its body paragraphs and an optional footer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub page: PageSetup,
    paragraphs: Vec<MutableParagraph>,
    footer: Option<Footer>,
}

impl Section {
    /// Create an empty section with the given page setup
    pub fn new(page: PageSetup) -> Self {
        Self {
            page,
            paragraphs: Vec::new(),
            footer: None,
        }
    }

    pub fn paragraphs(&self) -> &[MutableParagraph] {
        &self.paragraphs
    }

    /// Footer of the section, if one was created
    pub fn footer(&self) -> Option<&Footer> {
        self.footer.as_ref()
    }

    /// Footer of the section, created empty on first access
    pub fn footer_mut(&mut self) -> &mut Footer {
        self.footer.get_or_insert_with(Footer::default)
    }
}

/// DOCX Writer for generating a new package
#[derive(Debug, Clone, PartialEq)]
pub struct DocxWriter {
    sections: Vec<Section>,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxWriter {
    /// Create a writer holding one empty section with default page setup
    pub fn new() -> Self {
        Self {
            sections: vec![Section::default()],
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// The first section (always present)
    pub fn first_section_mut(&mut self) -> &mut Section {
        &mut self.sections[0]
    }

    /// Start a new section; later paragraphs go into it
    pub fn add_section(&mut self, page: PageSetup) -> &mut Section {
        self.sections.push(Section::new(page));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Append an empty paragraph to the last section and return it
    pub fn add_paragraph(&mut self) -> &mut MutableParagraph {
        let last = self.sections.len() - 1;
        let section = &mut self.sections[last];
        section.paragraphs.push(MutableParagraph::new());
        let idx = section.paragraphs.len() - 1;
        &mut section.paragraphs[idx]
    }

    /// All body paragraphs across sections, in order
    pub fn paragraphs(&self) -> impl Iterator<Item = &MutableParagraph> {
        self.sections.iter().flat_map(|s| s.paragraphs.iter())
    }

    /// Assemble the package parts
    ///
    /// Fails with [`OoxmlError::InvalidText`] if any body or footer run holds
    /// a control character that XML cannot represent.
    pub fn to_archive(&self) -> Result<OoxmlArchive> {
        for section in &self.sections {
            validate_text(&section.paragraphs)?;
            if let Some(footer) = &section.footer {
                validate_text(&footer.paragraphs)?;
            }
        }

        let mut archive = OoxmlArchive::new();
        let mut doc_rels = Relationships::new();
        doc_rels.add("styles.xml", Relationships::TYPE_STYLES);

        let mut footer_parts = Vec::new();
        let mut footer_ids = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            match &section.footer {
                Some(footer) => {
                    let name = format!("footer{}.xml", footer_parts.len() + 1);
                    let id = doc_rels.add(name.clone(), Relationships::TYPE_FOOTER);
                    archive.set_string(format!("word/{}", name), generate_footer_xml(footer));
                    footer_parts.push(name);
                    footer_ids.push(Some(id));
                }
                None => footer_ids.push(None),
            }
        }

        archive.set_string("word/document.xml", self.generate_document_xml(&footer_ids));
        archive.set_string("word/styles.xml", STYLES_XML);
        archive.set_string("word/_rels/document.xml.rels", doc_rels.to_xml());

        let mut package_rels = Relationships::new();
        package_rels.add("word/document.xml", Relationships::TYPE_OFFICE_DOCUMENT);
        archive.set_string(PACKAGE_RELS_PATH, package_rels.to_xml());
        archive.set_string(CONTENT_TYPES_PATH, generate_content_types(&footer_parts));

        debug!(
            sections = self.sections.len(),
            footers = footer_parts.len(),
            "assembled package"
        );
        Ok(archive)
    }

    /// Serialize the package to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_archive()?.to_bytes()
    }

    /// Write the package to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_archive()?.write_to_file(path)
    }

    /// Generate the complete document.xml content
    fn generate_document_xml(&self, footer_ids: &[Option<String>]) -> String {
        let mut output = String::new();
        output.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        output.push('\n');
        output.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}">"#,
            WORDPROCESSING_NS, OFFICE_RELATIONSHIPS_NS
        ));
        output.push('\n');
        output.push_str("<w:body>\n");

        let last = self.sections.len() - 1;
        for (i, section) in self.sections.iter().enumerate() {
            let sect_pr = generate_sect_pr(section, footer_ids[i].as_deref());
            if i == last {
                for para in &section.paragraphs {
                    generate_paragraph(&mut output, para, None);
                }
                output.push_str(&sect_pr);
                output.push('\n');
                continue;
            }

            // A non-final section ends with a paragraph carrying its sectPr
            match section.paragraphs.split_last() {
                Some((closing, rest)) => {
                    for para in rest {
                        generate_paragraph(&mut output, para, None);
                    }
                    generate_paragraph(&mut output, closing, Some(&sect_pr));
                }
                None => generate_paragraph(&mut output, &MutableParagraph::new(), Some(&sect_pr)),
            }
        }

        output.push_str("</w:body>\n");
        output.push_str("</w:document>");
        output
    }
}

fn generate_footer_xml(footer: &Footer) -> String {
    let mut output = String::new();
    output.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    output.push('\n');
    output.push_str(&format!(
        r#"<w:ftr xmlns:w="{}" xmlns:r="{}">"#,
        WORDPROCESSING_NS, OFFICE_RELATIONSHIPS_NS
    ));
    output.push('\n');
    if footer.paragraphs.is_empty() {
        // A footer part must hold at least one paragraph
        output.push_str("<w:p/>\n");
    }
    for para in &footer.paragraphs {
        generate_paragraph(&mut output, para, None);
    }
    output.push_str("</w:ftr>");
    output
}

fn generate_content_types(footer_parts: &[String]) -> String {
    let mut output = String::new();
    output.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    output.push('\n');
    output.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    output.push('\n');
    output.push_str(
        r#"  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    output.push('\n');
    output.push_str(r#"  <Default Extension="xml" ContentType="application/xml"/>"#);
    output.push('\n');
    output.push_str(
        r#"  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    );
    output.push('\n');
    output.push_str(
        r#"  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    );
    output.push('\n');
    for part in footer_parts {
        output.push_str(&format!(
            r#"  <Override PartName="/word/{}" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>"#,
            escape_xml(part)
        ));
        output.push('\n');
    }
    output.push_str("</Types>");
    output
}

fn generate_sect_pr(section: &Section, footer_id: Option<&str>) -> String {
    let page = &section.page;
    let mut xml = String::from("<w:sectPr>");
    if let Some(id) = footer_id {
        xml.push_str(&format!(
            r#"<w:footerReference w:type="default" r:id="{}"/>"#,
            escape_xml(id)
        ));
    }
    xml.push_str(&format!(
        r#"<w:pgSz w:w="{}" w:h="{}"/>"#,
        page.width.twips(),
        page.height.twips()
    ));
    xml.push_str(&format!(
        r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{}" w:footer="{}" w:gutter="0"/>"#,
        page.margin_top.twips(),
        page.margin_right.twips(),
        page.margin_bottom.twips(),
        page.margin_left.twips(),
        page.header_distance.twips(),
        page.footer_distance.twips()
    ));
    xml.push_str("</w:sectPr>");
    xml
}

/// Generate XML for a paragraph, optionally closing a section with `sect_pr`
fn generate_paragraph(output: &mut String, para: &MutableParagraph, sect_pr: Option<&str>) {
    output.push_str("<w:p>");

    // Child order follows CT_PPr: spacing, ind, jc, sectPr
    let mut ppr = String::new();
    let props = &para.props;
    if props.spacing_after.is_some() || props.line_spacing.is_some() {
        ppr.push_str("<w:spacing");
        if let Some(after) = props.spacing_after {
            ppr.push_str(&format!(r#" w:after="{}""#, after.twips()));
        }
        match props.line_spacing {
            Some(LineSpacing::Exact(line)) => {
                ppr.push_str(&format!(r#" w:line="{}" w:lineRule="exact""#, line.twips()));
            }
            None => {}
        }
        ppr.push_str("/>");
    }
    if let Some(indent) = props.first_line_indent {
        ppr.push_str(&format!(r#"<w:ind w:firstLine="{}"/>"#, indent.twips()));
    }
    if let Some(alignment) = props.alignment {
        ppr.push_str(&format!(r#"<w:jc w:val="{}"/>"#, alignment.as_str()));
    }
    if let Some(sect_pr) = sect_pr {
        ppr.push_str(sect_pr);
    }
    if !ppr.is_empty() {
        output.push_str("<w:pPr>");
        output.push_str(&ppr);
        output.push_str("</w:pPr>");
    }

    for run in &para.runs {
        generate_run(output, run);
    }

    output.push_str("</w:p>\n");
}

fn generate_run(output: &mut String, run: &MutableRun) {
    output.push_str("<w:r>");
    generate_run_props(output, &run.props);

    match &run.content {
        RunContent::Text(text) => generate_text(output, text),
        RunContent::Field(instruction) => {
            output.push_str(r#"<w:fldChar w:fldCharType="begin"/>"#);
            output.push_str(&format!(
                r#"<w:instrText xml:space="preserve">{}</w:instrText>"#,
                escape_xml(instruction)
            ));
            output.push_str(r#"<w:fldChar w:fldCharType="end"/>"#);
        }
    }

    output.push_str("</w:r>");
}

fn generate_run_props(output: &mut String, props: &RunProps) {
    if props.font.is_none() && props.size.is_none() && props.bold.is_none() {
        return;
    }

    output.push_str("<w:rPr>");
    if let Some(font) = &props.font {
        let ascii = escape_xml(&font.ascii);
        output.push_str(&format!(r#"<w:rFonts w:ascii="{}" w:hAnsi="{}""#, ascii, ascii));
        if let Some(east_asia) = &font.east_asia {
            output.push_str(&format!(r#" w:eastAsia="{}""#, escape_xml(east_asia)));
        }
        output.push_str("/>");
    }
    match props.bold {
        Some(true) => output.push_str("<w:b/>"),
        Some(false) => output.push_str(r#"<w:b w:val="0"/>"#),
        None => {}
    }
    if let Some(size) = props.size {
        let half_points = size.half_points();
        output.push_str(&format!(
            r#"<w:sz w:val="{}"/><w:szCs w:val="{}"/>"#,
            half_points, half_points
        ));
    }
    output.push_str("</w:rPr>");
}

/// Emit text, turning `\t`, `\n` and `\r` into their run elements
fn generate_text(output: &mut String, text: &str) {
    fn flush(output: &mut String, segment: &mut String) {
        if !segment.is_empty() {
            output.push_str(&format!(
                r#"<w:t xml:space="preserve">{}</w:t>"#,
                escape_xml(segment)
            ));
            segment.clear();
        }
    }

    let mut segment = String::new();
    for c in text.chars() {
        match c {
            '\t' => {
                flush(output, &mut segment);
                output.push_str("<w:tab/>");
            }
            '\n' | '\r' => {
                flush(output, &mut segment);
                output.push_str("<w:br/>");
            }
            other => segment.push(other),
        }
    }
    flush(output, &mut segment);
}
