//! End-to-end tests for the formatting pipeline
//!
//! Inputs are hand-built DOCX fixtures; outputs are read back through the
//! package reader and inspected as raw XML.

use std::path::{Path, PathBuf};

use gongwen_core::{
    format_document, FooterOutcome, FormatError, FormatOptions, StyleTable, Verification,
    DEFAULT_ORGANIZATION,
};
use gongwen_ooxml::test_utils::{
    create_docx, create_docx_with_footers, extract_document_xml, extract_file,
};
use gongwen_ooxml::{DocxPackage, OoxmlError};
use tempfile::TempDir;

const SAMPLE: [&str; 9] = [
    "",
    "1. 测试",
    "一、总则",
    "",
    "（三）具体措施",
    "5. 说明",
    "   ",
    "（7）备注",
    "本办法经研究决定，自发布之日起施行。",
];

fn write_input(dir: &TempDir, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join("input.docx");
    std::fs::write(&path, bytes).unwrap();
    path
}

fn run(input: &Path, output: &Path) -> gongwen_core::FormatReport {
    format_document(input, output, &FormatOptions::default(), &StyleTable::official()).unwrap()
}

/// `<w:p>` elements of the body, as raw XML strings
fn body_paragraphs(xml: &str) -> Vec<String> {
    xml.split("<w:p>")
        .skip(1)
        .map(|p| p.split("</w:p>").next().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_paragraph_count_and_order() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &create_docx(&SAMPLE));
    let output = dir.path().join("output.docx");

    let report = run(&input, &output);
    assert_eq!(report.paragraphs, 6);

    let package = DocxPackage::open(&output).unwrap();
    let texts: Vec<&str> = package.paragraphs().iter().map(|p| p.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "1. 测试",
            "一、总则",
            "（三）具体措施",
            "5. 说明",
            "（7）备注",
            "本办法经研究决定，自发布之日起施行。",
            DEFAULT_ORGANIZATION,
        ]
    );
    assert!(package.paragraphs().iter().all(|p| !p.is_blank()));
}

#[test]
fn test_categories_in_output_xml() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &create_docx(&SAMPLE));
    let output = dir.path().join("output.docx");
    run(&input, &output);

    let bytes = std::fs::read(&output).unwrap();
    let paras = body_paragraphs(&extract_document_xml(&bytes));
    assert_eq!(paras.len(), 7);

    // Title: centred 方正小标宋简体 22pt, no indent even though it reads like a heading
    assert!(paras[0].contains(r#"<w:jc w:val="center"/>"#));
    assert!(paras[0].contains(r#"w:eastAsia="方正小标宋简体""#));
    assert!(paras[0].contains(r#"<w:sz w:val="44"/>"#));
    assert!(!paras[0].contains("w:firstLine"));

    assert!(paras[1].contains(r#"w:eastAsia="黑体""#));
    assert!(paras[2].contains(r#"w:eastAsia="楷体_GB2312""#));
    for heading in &paras[1..5] {
        assert!(heading.contains("<w:b/>"));
        assert!(heading.contains(r#"<w:jc w:val="left"/>"#));
    }
    assert!(paras[3].contains(r#"w:eastAsia="仿宋_GB2312""#));
    assert!(paras[4].contains(r#"w:eastAsia="仿宋_GB2312""#));

    let body = &paras[5];
    assert!(body.contains(r#"<w:jc w:val="both"/>"#));
    assert!(body.contains(r#"<w:b w:val="0"/>"#));
    for para in &paras[1..6] {
        assert!(para.contains(r#"<w:spacing w:after="0" w:line="560" w:lineRule="exact"/>"#));
        assert!(para.contains(r#"<w:ind w:firstLine="640"/>"#));
    }

    let signature = &paras[6];
    assert!(signature.contains(r#"<w:jc w:val="right"/>"#));
    assert!(signature.contains(DEFAULT_ORGANIZATION));
}

#[test]
fn test_page_geometry() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &create_docx(&["通知"]));
    let output = dir.path().join("output.docx");
    run(&input, &output);

    let xml = extract_document_xml(&std::fs::read(&output).unwrap());
    assert!(xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
    assert!(xml.contains(r#"w:top="2098" w:right="1474" w:bottom="1814" w:left="1587""#));
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &create_docx(&SAMPLE));
    let first = dir.path().join("first.docx");
    let second = dir.path().join("second.docx");

    run(&input, &first);
    run(&input, &second);
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn test_field_footer_in_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        &create_docx_with_footers(&["通知", "正文"], &[Some("第1页"), Some("第2页")]),
    );
    let output = dir.path().join("output.docx");

    let report = run(&input, &output);
    assert_eq!(report.sections, 1);
    assert_eq!(report.footer, FooterOutcome::Field);
    assert_eq!(report.verification, Some(Verification::Present));

    let bytes = std::fs::read(&output).unwrap();
    let footer = extract_file(&bytes, "word/footer1.xml").unwrap();
    assert!(footer.contains(r#"<w:fldChar w:fldCharType="begin"/>"#));
    assert!(footer.contains(r#"<w:instrText xml:space="preserve">PAGE</w:instrText>"#));
    assert!(footer.contains(r#"<w:jc w:val="center"/>"#));
    assert!(footer.contains(r#"w:ascii="Times New Roman""#));
    assert!(!footer.contains("第1页"));
    assert!(extract_file(&bytes, "word/footer2.xml").is_none());
}

#[test]
fn test_fallback_footer_in_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &create_docx(&["通知", "正文"]));
    let output = dir.path().join("output.docx");
    let mut table = StyleTable::official();
    table.footer.field_instruction = String::new();

    let report = format_document(&input, &output, &FormatOptions::default(), &table).unwrap();
    assert_eq!(report.footer, FooterOutcome::Fallback);
    assert_eq!(report.verification, Some(Verification::Present));

    let package = DocxPackage::open(&output).unwrap();
    let footers = package.section_footers().unwrap();
    assert_eq!(footers.len(), 1);
    assert_eq!(footers[0].as_ref().unwrap()[0].text, "- 1 -");
}

#[test]
fn test_custom_and_empty_organization() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &create_docx(&["通知", "正文"]));

    for organization in ["某某县人民政府\n2024年5月1日", ""] {
        let output = dir.path().join("output.docx");
        let options = FormatOptions {
            organization: organization.to_string(),
            ..FormatOptions::default()
        };
        let report = format_document(&input, &output, &options, &StyleTable::official()).unwrap();
        assert_eq!(report.paragraphs, 2);

        let package = DocxPackage::open(&output).unwrap();
        let last = package.paragraphs().last().unwrap();
        assert_eq!(last.text, organization);
    }
}

#[test]
fn test_organization_carriage_return_is_line_break() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &create_docx(&["通知"]));
    let output = dir.path().join("output.docx");
    let options = FormatOptions {
        organization: "某某县人民政府\r2024年5月1日".to_string(),
        ..FormatOptions::default()
    };
    format_document(&input, &output, &options, &StyleTable::official()).unwrap();

    let package = DocxPackage::open(&output).unwrap();
    let last = package.paragraphs().last().unwrap();
    assert_eq!(last.text, "某某县人民政府\n2024年5月1日");
}

#[test]
fn test_organization_with_control_characters_is_refused() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &create_docx(&["通知", "正文"]));
    let output = dir.path().join("output.docx");
    let options = FormatOptions {
        organization: "某局\u{1}\u{b}".to_string(),
        ..FormatOptions::default()
    };

    let err = format_document(&input, &output, &options, &StyleTable::official()).unwrap_err();
    assert!(matches!(err, FormatError::Build(OoxmlError::InvalidText(_))));
    assert!(!output.exists());
}
