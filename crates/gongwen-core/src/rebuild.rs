//! Document rebuilding
//!
//! A fresh document is built from the classified paragraphs of the source:
//! the page geometry goes on the first section, then every paragraph is
//! emitted with the style of its category, and finally the signature line.

use gongwen_ooxml::DocxWriter;
use tracing::debug;

use crate::classify::{classify_paragraphs, ClassifiedParagraph};
use crate::style::{StyleRule, StyleTable};

/// Default signature line
pub const DEFAULT_ORGANIZATION: &str = "发文单位名称年月日";

/// Build a new document from source paragraph texts
///
/// Blank paragraphs are dropped, the first remaining paragraph becomes the
/// title, and all others are styled by their leading enumerator.
pub fn rebuild<I, S>(paragraphs: I, table: &StyleTable) -> DocxWriter
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rebuild_classified(&classify_paragraphs(paragraphs), table)
}

/// Build a new document from already classified paragraphs
pub fn rebuild_classified(paragraphs: &[ClassifiedParagraph], table: &StyleTable) -> DocxWriter {
    let mut writer = DocxWriter::new();
    writer.first_section_mut().page = table.page.page_setup();

    for (index, paragraph) in paragraphs.iter().enumerate() {
        debug!(index, category = %paragraph.category, text = %paragraph.text, "emit paragraph");
        emit(&mut writer, &paragraph.text, table.rule(paragraph.category));
    }
    writer
}

/// Append the signature line after the content paragraphs
///
/// The organization string is written verbatim; an empty string still
/// produces the (empty) signature paragraph.
pub fn append_signature(writer: &mut DocxWriter, organization: &str, table: &StyleTable) {
    emit(writer, organization, &table.signature);
}

fn emit(writer: &mut DocxWriter, text: &str, rule: &StyleRule) {
    let para = writer.add_paragraph();
    para.props = rule.paragraph_props();
    para.add_run(text, rule.run_props());
}

#[cfg(test)]
mod tests {
    use super::*;
    use gongwen_ooxml::{Alignment, Length, LineSpacing};

    fn texts(writer: &DocxWriter) -> Vec<String> {
        writer.paragraphs().map(|p| p.text()).collect()
    }

    #[test]
    fn test_rebuild_skips_blank_and_keeps_order() {
        let table = StyleTable::official();
        let writer = rebuild(["", "通知", "  ", "一、总则", "正文内容"], &table);
        assert_eq!(texts(&writer), vec!["通知", "一、总则", "正文内容"]);
    }

    #[test]
    fn test_rebuild_applies_page_geometry() {
        let table = StyleTable::official();
        let writer = rebuild(["通知"], &table);
        assert_eq!(writer.sections().len(), 1);
        assert_eq!(writer.sections()[0].page, table.page.page_setup());
    }

    #[test]
    fn test_title_paragraph_style() {
        let table = StyleTable::official();
        let writer = rebuild(["1. 测试", "正文"], &table);
        let title = writer.paragraphs().next().unwrap();

        assert_eq!(title.props.alignment, Some(Alignment::Center));
        assert_eq!(title.props.first_line_indent, None);
        assert_eq!(title.props.line_spacing, None);
        assert_eq!(title.runs()[0].props, table.title.run_props());
    }

    #[test]
    fn test_heading_and_body_styles() {
        let table = StyleTable::official();
        let writer = rebuild(["通知", "（三）具体措施", "本办法经研究决定。"], &table);
        let paras: Vec<_> = writer.paragraphs().collect();

        assert_eq!(paras[1].props.alignment, Some(Alignment::Left));
        assert_eq!(paras[1].runs()[0].props, table.level2.run_props());
        assert_eq!(paras[2].props.alignment, Some(Alignment::Justify));
        assert_eq!(paras[2].runs()[0].props, table.body.run_props());
        for para in &paras[1..] {
            assert_eq!(para.props.first_line_indent, Some(Length::pt(32.0)));
            assert_eq!(para.props.line_spacing, Some(LineSpacing::Exact(Length::pt(28.0))));
            assert_eq!(para.props.spacing_after, Some(Length::ZERO));
        }
    }

    #[test]
    fn test_empty_source_yields_no_paragraphs() {
        let table = StyleTable::official();
        let writer = rebuild(["", " "], &table);
        assert_eq!(writer.paragraphs().count(), 0);
    }

    #[test]
    fn test_signature_is_last_and_right_aligned() {
        let table = StyleTable::official();
        let mut writer = rebuild(["通知", "正文"], &table);
        append_signature(&mut writer, "某某市人民政府办公室", &table);

        let last = writer.paragraphs().last().unwrap();
        assert_eq!(last.text(), "某某市人民政府办公室");
        assert_eq!(last.props.alignment, Some(Alignment::Right));
        assert_eq!(last.runs()[0].props, table.body.run_props());
        assert_eq!(writer.paragraphs().count(), 3);
    }

    #[test]
    fn test_empty_signature_accepted() {
        let table = StyleTable::official();
        let mut writer = rebuild(["通知"], &table);
        append_signature(&mut writer, "", &table);
        assert_eq!(texts(&writer), vec!["通知", ""]);
    }
}
