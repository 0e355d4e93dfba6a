//! Small XML helpers shared by the reader and the writer

use quick_xml::events::BytesStart;

/// WordprocessingML main namespace
pub const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Office document relationships namespace (`r:` prefix)
pub const OFFICE_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Get an attribute value by local name, ignoring its namespace prefix
pub(crate) fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Get an attribute value parsed as an unsigned integer
pub(crate) fn get_attr_u32(e: &BytesStart, name: &[u8]) -> Option<u32> {
    get_attr(e, name).and_then(|v| v.trim().parse().ok())
}

/// Escape special XML characters
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Hello & World"), "Hello &amp; World");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_xml("一、总则"), "一、总则");
    }

    #[test]
    fn test_get_attr_ignores_prefix() {
        let e = BytesStart::from_content(r#"w:footerReference w:type="default" r:id="rId7""#, 17);
        assert_eq!(get_attr(&e, b"type").as_deref(), Some("default"));
        assert_eq!(get_attr(&e, b"id").as_deref(), Some("rId7"));
        assert_eq!(get_attr(&e, b"missing"), None);
    }

    #[test]
    fn test_get_attr_u32() {
        let e = BytesStart::from_content(r#"w:pgSz w:w="11906" w:h="x""#, 6);
        assert_eq!(get_attr_u32(&e, b"w"), Some(11906));
        assert_eq!(get_attr_u32(&e, b"h"), None);
    }
}
