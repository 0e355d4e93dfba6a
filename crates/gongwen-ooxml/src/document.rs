//! Story parsing (word/document.xml, word/footerN.xml)
//!
//! Only what the formatter needs survives parsing: the plain text of each
//! top-level paragraph and, in the main document, the section properties
//! with their footer references. Tables, drawings and text boxes are
//! skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::{get_attr, get_attr_u32};

/// A parsed main document part
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Top-level body paragraphs, in document order
    pub paragraphs: Vec<Paragraph>,
    /// Section properties, in document order (the body-level one last)
    pub sections: Vec<SectionProperties>,
}

/// A paragraph reduced to its text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Concatenated run text; tabs and breaks appear as `\t` and `\n`
    pub text: String,
}

/// Which pages of a section a header or footer applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFooterKind {
    /// Odd pages, or every page when no other kind is defined
    Default,
    /// First page of the section
    First,
    /// Even pages
    Even,
}

impl HeaderFooterKind {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("first") => Self::First,
            Some("even") => Self::Even,
            _ => Self::Default,
        }
    }
}

/// A `w:footerReference` inside section properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterReference {
    /// Kind of pages the footer applies to
    pub kind: HeaderFooterKind,
    /// Relationship ID of the footer part
    pub rel_id: String,
}

/// Page size in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

/// Page margins in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
    pub header: u32,
    pub footer: u32,
}

/// Properties of one section (`w:sectPr`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionProperties {
    pub footer_refs: Vec<FooterReference>,
    pub page_size: Option<PageSize>,
    pub page_margins: Option<PageMargins>,
}

impl SectionProperties {
    /// Relationship ID of the default footer, if the section declares one
    pub fn default_footer(&self) -> Option<&str> {
        self.footer_refs
            .iter()
            .find(|r| r.kind == HeaderFooterKind::Default)
            .map(|r| r.rel_id.as_str())
    }
}

impl Document {
    /// Parse a main document part from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let story = StoryParser::new(b"body").run(xml)?;
        Ok(Document {
            paragraphs: story.paragraphs,
            sections: story.sections,
        })
    }
}

impl Paragraph {
    /// Paragraph with the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whether the paragraph is empty once whitespace is stripped
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Parse the top-level paragraphs of a footer part (`w:ftr`)
pub fn parse_footer(xml: &[u8]) -> Result<Vec<Paragraph>> {
    Ok(StoryParser::new(b"ftr").run(xml)?.paragraphs)
}

struct Story {
    paragraphs: Vec<Paragraph>,
    sections: Vec<SectionProperties>,
}

/// Event-driven parser for a story part
///
/// Keeps a stack of open element names so that only paragraphs whose parent
/// is the story container count; paragraphs nested in tables or text boxes
/// are skipped along with their text.
struct StoryParser {
    container: &'static [u8],
    stack: Vec<Vec<u8>>,
    paragraphs: Vec<Paragraph>,
    sections: Vec<SectionProperties>,
    current_para: Option<ParagraphBuilder>,
    current_section: Option<SectionProperties>,
    in_text_element: bool,
}

#[derive(Default)]
struct ParagraphBuilder {
    /// Stack depth at which the paragraph element sits
    depth: usize,
    text: String,
}

impl StoryParser {
    fn new(container: &'static [u8]) -> Self {
        Self {
            container,
            stack: Vec::new(),
            paragraphs: Vec::new(),
            sections: Vec::new(),
            current_para: None,
            current_section: None,
            in_text_element: false,
        }
    }

    fn run(mut self, xml: &[u8]) -> Result<Story> {
        let mut reader = Reader::from_reader(xml);
        // Don't trim text - preserve whitespace in runs
        reader.config_mut().trim_text(false);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = e.local_name().as_ref().to_vec();
                    self.open(e, &name, false);
                    self.stack.push(name);
                }
                Ok(Event::Empty(ref e)) => {
                    let name = e.local_name().as_ref().to_vec();
                    self.open(e, &name, true);
                    self.close(&name);
                }
                Ok(Event::End(ref e)) => {
                    let name = e.local_name().as_ref().to_vec();
                    match self.stack.pop() {
                        Some(open) if open == name => {}
                        _ => {
                            return Err(OoxmlError::InvalidStructure(format!(
                                "unexpected closing tag </{}>",
                                String::from_utf8_lossy(&name)
                            )))
                        }
                    }
                    self.close(&name);
                }
                Ok(Event::Text(ref e)) => {
                    if self.in_text_element {
                        let text = e.unescape()?;
                        self.push_text(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if self.in_text_element {
                        let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                        self.push_text(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Story {
            paragraphs: self.paragraphs,
            sections: self.sections,
        })
    }

    fn parent(&self) -> Option<&[u8]> {
        self.stack.last().map(|n| n.as_slice())
    }

    /// Whether the innermost open elements put us inside run content of the
    /// current top-level paragraph
    fn in_run_content(&self) -> bool {
        let Some(para) = &self.current_para else {
            return false;
        };
        let inner = &self.stack[para.depth..];
        inner.iter().any(|n| n == b"r")
            && !inner
                .iter()
                .any(|n| n == b"rPr" || n == b"txbxContent" || n == b"tbl" || n == b"instrText")
    }

    fn open(&mut self, e: &BytesStart, name: &[u8], empty: bool) {
        match name {
            b"p" if self.current_para.is_none() && self.parent() == Some(self.container) => {
                self.current_para = Some(ParagraphBuilder {
                    depth: self.stack.len(),
                    ..Default::default()
                });
            }
            b"t" if !empty && self.in_run_content() => {
                self.in_text_element = true;
            }
            b"tab" if self.in_run_content() => self.push_text("\t"),
            b"br" | b"cr" if self.in_run_content() => self.push_text("\n"),
            b"noBreakHyphen" if self.in_run_content() => self.push_text("-"),
            b"sectPr" if self.is_section_position() => {
                self.current_section = Some(SectionProperties::default());
            }
            b"footerReference" => {
                if let Some(section) = self.current_section.as_mut() {
                    if let Some(rel_id) = get_attr(e, b"id") {
                        section.footer_refs.push(FooterReference {
                            kind: HeaderFooterKind::from_attr(get_attr(e, b"type").as_deref()),
                            rel_id,
                        });
                    }
                }
            }
            b"pgSz" => {
                if let Some(section) = self.current_section.as_mut() {
                    if let (Some(width), Some(height)) =
                        (get_attr_u32(e, b"w"), get_attr_u32(e, b"h"))
                    {
                        section.page_size = Some(PageSize { width, height });
                    }
                }
            }
            b"pgMar" => {
                if let Some(section) = self.current_section.as_mut() {
                    section.page_margins = Some(PageMargins {
                        top: get_attr_u32(e, b"top").unwrap_or(0),
                        bottom: get_attr_u32(e, b"bottom").unwrap_or(0),
                        left: get_attr_u32(e, b"left").unwrap_or(0),
                        right: get_attr_u32(e, b"right").unwrap_or(0),
                        header: get_attr_u32(e, b"header").unwrap_or(0),
                        footer: get_attr_u32(e, b"footer").unwrap_or(0),
                    });
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text_element = false,
            b"sectPr" if self.is_section_position() => {
                if let Some(section) = self.current_section.take() {
                    self.sections.push(section);
                }
            }
            b"p" => {
                let finished = self
                    .current_para
                    .as_ref()
                    .is_some_and(|p| p.depth == self.stack.len());
                if finished {
                    if let Some(para) = self.current_para.take() {
                        self.paragraphs.push(Paragraph { text: para.text });
                    }
                }
            }
            _ => {}
        }
    }

    /// A `w:sectPr` counts when it is a direct child of the body, or sits in
    /// the `w:pPr` of a top-level paragraph (a section break).
    fn is_section_position(&self) -> bool {
        if self.container != b"body" {
            return false;
        }
        match self.parent() {
            Some(b"body") => true,
            Some(b"pPr") => self
                .current_para
                .as_ref()
                .is_some_and(|p| self.stack.len() == p.depth + 2),
            _ => false,
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(para) = self.current_para.as_mut() {
            para.text.push_str(text);
        }
    }
}
