//! The official-document style table
//!
//! Every formatting constant the rebuilder, signature appender and footer
//! injector apply lives here. The table is an immutable value built once
//! with [`StyleTable::official`] and passed by reference to each stage.

use serde::Serialize;

use gongwen_ooxml::{
    Alignment as OoxmlAlignment, FontFamily, Length, LineSpacing, PageSetup, ParagraphProps,
    RunProps,
};

use crate::classify::Category;

/// Font families that need the East Asian font slot
const CJK_FONT_MARKERS: [&str; 4] = ["方正", "黑体", "楷体_GB2312", "仿宋_GB2312"];

/// Horizontal alignment of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl From<Alignment> for OoxmlAlignment {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::Left => OoxmlAlignment::Left,
            Alignment::Center => OoxmlAlignment::Center,
            Alignment::Right => OoxmlAlignment::Right,
            Alignment::Justify => OoxmlAlignment::Justify,
        }
    }
}

/// Formatting bound to one paragraph category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    pub font: String,
    /// Font size in points
    pub size_pt: f64,
    pub bold: bool,
    pub alignment: Alignment,
    /// Exact line pitch in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing_pt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_line_indent_pt: Option<f64>,
    /// Space after the paragraph in points
    pub spacing_after_pt: f64,
}

impl StyleRule {
    /// Run formatting for text in this style
    pub fn run_props(&self) -> RunProps {
        RunProps {
            font: Some(font_family(&self.font)),
            size: Some(Length::pt(self.size_pt)),
            bold: Some(self.bold),
        }
    }

    /// Paragraph formatting for this style
    pub fn paragraph_props(&self) -> ParagraphProps {
        ParagraphProps {
            alignment: Some(self.alignment.into()),
            spacing_after: Some(Length::pt(self.spacing_after_pt)),
            line_spacing: self
                .line_spacing_pt
                .map(|pt| LineSpacing::Exact(Length::pt(pt))),
            first_line_indent: self.first_line_indent_pt.map(Length::pt),
        }
    }
}

/// Page number footer formatting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterStyle {
    pub font: String,
    pub size_pt: f64,
    pub alignment: Alignment,
    /// Field instruction that renders the current page number
    pub field_instruction: String,
}

impl FooterStyle {
    pub fn run_props(&self) -> RunProps {
        RunProps {
            font: Some(font_family(&self.font)),
            size: Some(Length::pt(self.size_pt)),
            bold: None,
        }
    }
}

/// Page size and margins, in centimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width_cm: f64,
    pub height_cm: f64,
    pub margin_top_cm: f64,
    pub margin_bottom_cm: f64,
    pub margin_left_cm: f64,
    pub margin_right_cm: f64,
}

impl PageGeometry {
    /// Section page setup for this geometry
    pub fn page_setup(&self) -> PageSetup {
        PageSetup {
            width: Length::cm(self.width_cm),
            height: Length::cm(self.height_cm),
            margin_top: Length::cm(self.margin_top_cm),
            margin_bottom: Length::cm(self.margin_bottom_cm),
            margin_left: Length::cm(self.margin_left_cm),
            margin_right: Length::cm(self.margin_right_cm),
            ..PageSetup::default()
        }
    }
}

/// The complete style table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleTable {
    pub page: PageGeometry,
    pub title: StyleRule,
    pub level1: StyleRule,
    pub level2: StyleRule,
    pub level3: StyleRule,
    pub body: StyleRule,
    pub signature: StyleRule,
    pub footer: FooterStyle,
}

impl StyleTable {
    /// The fixed official-document layout: A4 page, 方正小标宋简体 title,
    /// three heading levels and 仿宋_GB2312 body text on a 28 pt grid
    pub fn official() -> Self {
        let text_rule = |font: &str, bold: bool, alignment: Alignment| StyleRule {
            font: font.to_string(),
            size_pt: 16.0,
            bold,
            alignment,
            line_spacing_pt: Some(28.0),
            first_line_indent_pt: Some(32.0),
            spacing_after_pt: 0.0,
        };

        Self {
            page: PageGeometry {
                width_cm: 21.0,
                height_cm: 29.7,
                margin_top_cm: 3.7,
                margin_bottom_cm: 3.2,
                margin_left_cm: 2.8,
                margin_right_cm: 2.6,
            },
            title: StyleRule {
                font: "方正小标宋简体".to_string(),
                size_pt: 22.0,
                bold: false,
                alignment: Alignment::Center,
                line_spacing_pt: None,
                first_line_indent_pt: None,
                spacing_after_pt: 0.0,
            },
            level1: text_rule("黑体", true, Alignment::Left),
            level2: text_rule("楷体_GB2312", true, Alignment::Left),
            level3: text_rule("仿宋_GB2312", true, Alignment::Left),
            body: text_rule("仿宋_GB2312", false, Alignment::Justify),
            signature: StyleRule {
                font: "仿宋_GB2312".to_string(),
                size_pt: 16.0,
                bold: false,
                alignment: Alignment::Right,
                line_spacing_pt: None,
                first_line_indent_pt: None,
                spacing_after_pt: 0.0,
            },
            footer: FooterStyle {
                font: "Times New Roman".to_string(),
                size_pt: 14.0,
                alignment: Alignment::Center,
                field_instruction: "PAGE".to_string(),
            },
        }
    }

    /// Style rule for a paragraph category
    pub fn rule(&self, category: Category) -> &StyleRule {
        match category {
            Category::Title => &self.title,
            Category::Level1 => &self.level1,
            Category::Level2 => &self.level2,
            Category::Level3 => &self.level3,
            Category::Body => &self.body,
        }
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::official()
    }
}

fn font_family(name: &str) -> FontFamily {
    let cjk = CJK_FONT_MARKERS.iter().any(|marker| name.contains(marker));
    FontFamily {
        ascii: name.to_string(),
        east_asia: cjk.then(|| name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_official_page_setup_twips() {
        let page = StyleTable::official().page.page_setup();
        assert_eq!(page.width.twips(), 11906);
        assert_eq!(page.height.twips(), 16838);
        assert_eq!(page.margin_top.twips(), 2098);
        assert_eq!(page.margin_bottom.twips(), 1814);
        assert_eq!(page.margin_left.twips(), 1587);
        assert_eq!(page.margin_right.twips(), 1474);
    }

    #[test]
    fn test_title_has_no_indent_or_line_spacing() {
        let props = StyleTable::official().title.paragraph_props();
        assert_eq!(props.alignment, Some(OoxmlAlignment::Center));
        assert_eq!(props.line_spacing, None);
        assert_eq!(props.first_line_indent, None);
        assert_eq!(props.spacing_after, Some(Length::ZERO));
    }

    #[test]
    fn test_heading_and_body_share_grid() {
        let table = StyleTable::official();
        for category in [Category::Level1, Category::Level2, Category::Level3, Category::Body] {
            let props = table.rule(category).paragraph_props();
            assert_eq!(props.line_spacing, Some(LineSpacing::Exact(Length::pt(28.0))));
            assert_eq!(props.first_line_indent.map(|l| l.twips()), Some(640));
        }
        assert_eq!(
            table.body.paragraph_props().alignment,
            Some(OoxmlAlignment::Justify)
        );
        assert_eq!(
            table.level2.paragraph_props().alignment,
            Some(OoxmlAlignment::Left)
        );
    }

    #[test]
    fn test_cjk_fonts_fill_east_asia_slot() {
        let table = StyleTable::official();

        let heading = table.level1.run_props();
        assert_eq!(heading.bold, Some(true));
        assert_eq!(heading.size.map(|s| s.half_points()), Some(32));
        assert_eq!(heading.font.unwrap().east_asia.as_deref(), Some("黑体"));

        let footer = table.footer.run_props();
        let font = footer.font.unwrap();
        assert_eq!(font.ascii, "Times New Roman");
        assert_eq!(font.east_asia, None);
        assert_eq!(footer.size.map(|s| s.half_points()), Some(28));
    }

    #[test]
    fn test_signature_uses_body_font() {
        let table = StyleTable::official();
        assert_eq!(table.signature.font, table.body.font);
        assert_eq!(table.signature.size_pt, table.body.size_pt);
        assert_eq!(table.signature.bold, table.body.bold);
        assert_eq!(table.signature.alignment, Alignment::Right);
    }
}
