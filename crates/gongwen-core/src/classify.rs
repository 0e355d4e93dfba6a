//! Paragraph classification
//!
//! Headings in official documents are recognised purely by their leading
//! enumerator token. The rules form an ordered list evaluated first match
//! wins; anything that matches none of them is body text.

use std::fmt;

/// Role of a paragraph in the formatted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Title,
    Level1,
    Level2,
    Level3,
    Body,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Level1 => "heading-level-1",
            Self::Level2 => "heading-level-2",
            Self::Level3 => "heading-level-3",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A paragraph text with its resolved category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedParagraph {
    pub text: String,
    pub category: Category,
}

const CJK_NUMERALS: [&str; 10] = ["一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];

/// 一、 through 十、
fn is_level1(text: &str) -> bool {
    CJK_NUMERALS
        .iter()
        .any(|n| text.strip_prefix(n).is_some_and(|rest| rest.starts_with('、')))
}

/// （一） through （十）, full-width parentheses only
fn is_level2(text: &str) -> bool {
    text.strip_prefix('（').is_some_and(|rest| {
        CJK_NUMERALS
            .iter()
            .any(|n| rest.strip_prefix(n).is_some_and(|tail| tail.starts_with('）')))
    })
}

/// 1. through 19.
fn is_numbered(text: &str) -> bool {
    (1..=19).any(|i| text.starts_with(&format!("{}.", i)))
}

/// （1） through （10）
fn is_parenthesized_number(text: &str) -> bool {
    (1..=10).any(|i| text.starts_with(&format!("（{}）", i)))
}

/// Classification rules in precedence order
const RULES: [(fn(&str) -> bool, Category); 4] = [
    (is_level1, Category::Level1),
    (is_level2, Category::Level2),
    (is_numbered, Category::Level3),
    (is_parenthesized_number, Category::Level3),
];

/// Classify a paragraph by its leading token
///
/// Surrounding whitespace is ignored. Never returns [`Category::Title`];
/// the title is assigned by position, see [`classify_paragraphs`].
pub fn classify(text: &str) -> Category {
    let text = text.trim();
    RULES
        .iter()
        .find(|(matches, _)| matches(text))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Body)
}

/// Classify a document's paragraphs in order
///
/// Blank paragraphs are dropped, the first remaining one becomes the
/// title regardless of its text, and every later one goes through
/// [`classify`]. Texts are returned trimmed.
pub fn classify_paragraphs<I, S>(paragraphs: I) -> Vec<ClassifiedParagraph>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut classified: Vec<ClassifiedParagraph> = Vec::new();
    for paragraph in paragraphs {
        let text = paragraph.as_ref().trim();
        if text.is_empty() {
            continue;
        }
        let category = if classified.is_empty() {
            Category::Title
        } else {
            classify(text)
        };
        classified.push(ClassifiedParagraph {
            text: text.to_string(),
            category,
        });
    }
    classified
}
