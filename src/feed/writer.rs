//! Serializes a document tree to XML text with `quick-xml`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use std::path::Path;

use super::builder::Element;
use super::error::FormatError;
use super::options::FormatOptions;

/// Whether this build can indent its output (the `pretty` cargo feature).
pub const PRETTY_PRINT_AVAILABLE: bool = cfg!(feature = "pretty");

/// Reports the pretty-printing capability.
///
/// When it is `false`, a request for pretty output produces compact XML and
/// logs a warning.
pub fn can_pretty_print() -> bool {
    PRETTY_PRINT_AVAILABLE
}

/// Serializes `tree` to a string.
///
/// Compact mode writes no whitespace between elements. Pretty mode indents
/// nested elements by `options.indent` spaces per level; builds without the
/// `pretty` feature have no indenting writer and fall back to compact.
pub fn serialize(tree: &Element, options: &FormatOptions) -> Result<String, FormatError> {
    let mut writer = new_writer(options);

    if options.xml_declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
    }
    write_element(&mut writer, tree)?;

    let bytes = writer.into_inner();
    String::from_utf8(bytes).map_err(|e| FormatError::Xml(e.to_string()))
}

#[cfg(feature = "pretty")]
fn new_writer(options: &FormatOptions) -> Writer<Vec<u8>> {
    if options.pretty {
        Writer::new_with_indent(Vec::new(), b' ', options.indent)
    } else {
        Writer::new(Vec::new())
    }
}

#[cfg(not(feature = "pretty"))]
fn new_writer(options: &FormatOptions) -> Writer<Vec<u8>> {
    if options.pretty {
        tracing::warn!("Pretty printing unavailable in this build, writing compact XML");
    }
    Writer::new(Vec::new())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), FormatError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.text.is_none() && element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    if let Some(ref text) = element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_error)
}

fn xml_error(e: impl std::fmt::Display) -> FormatError {
    FormatError::Xml(e.to_string())
}

/// Writes `content` to `path` atomically.
///
/// The bytes go to a temporary file in the same directory, which is synced
/// and then renamed over `path`, so readers never see a partial feed.
pub fn write_atomically(content: &str, path: &Path) -> Result<(), FormatError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    // Randomized temp name so a concurrent writer cannot collide with us.
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)?;

    let written = file
        .write_all(content.as_bytes())
        .and_then(|()| file.sync_all());
    drop(file);

    if let Err(e) = written.and_then(|()| std::fs::rename(&temp_path, path)) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote feed file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Element {
        Element::new("rss").with_attribute("version", "2.0").with_child(
            Element::new("channel")
                .with_child(Element::new("title").with_text("T"))
                .with_child(Element::new("link").with_attribute("href", "http://x/")),
        )
    }

    #[test]
    fn test_compact_output() {
        let out = serialize(&sample(), &FormatOptions::utc()).unwrap();
        assert_eq!(
            out,
            r#"<rss version="2.0"><channel><title>T</title><link href="http://x/"/></channel></rss>"#
        );
    }

    #[test]
    fn test_escaping() {
        let tree = Element::new("item")
            .with_child(Element::new("description").with_text("<b>fish & chips</b>"))
            .with_child(Element::new("link").with_attribute("href", "http://x/?a=1&b=2"));
        let out = serialize(&tree, &FormatOptions::utc()).unwrap();
        assert!(out.contains("&lt;b&gt;fish &amp; chips&lt;/b&gt;"), "{out}");
        assert!(out.contains(r#"href="http://x/?a=1&amp;b=2""#), "{out}");
    }

    #[test]
    fn test_xml_declaration() {
        let options = FormatOptions::utc().with_xml_declaration(true);
        let out = serialize(&sample(), &options).unwrap();
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#), "{out}");
        assert!(out.contains("<rss"));
    }

    #[test]
    fn test_empty_text_is_kept_as_element_pair() {
        let tree = Element::new("item").with_child(Element::new("title").with_text(""));
        let out = serialize(&tree, &FormatOptions::utc()).unwrap();
        assert_eq!(out, "<item><title></title></item>");
    }

    #[cfg(feature = "pretty")]
    #[test]
    fn test_pretty_output_indents() {
        assert!(can_pretty_print());
        let options = FormatOptions::utc().with_pretty(true);
        let out = serialize(&sample(), &options).unwrap();
        assert!(out.contains("\n    <channel>"), "{out}");
        assert!(out.contains("\n        <title>T</title>"), "{out}");
    }

    #[cfg(feature = "pretty")]
    #[test]
    fn test_pretty_indent_width() {
        let options = FormatOptions::utc().with_pretty(true).with_indent(2);
        let out = serialize(&sample(), &options).unwrap();
        assert!(out.contains("\n  <channel>"), "{out}");
        assert!(out.contains("\n    <title>T</title>"), "{out}");
    }

    #[cfg(not(feature = "pretty"))]
    #[test]
    fn test_pretty_falls_back_to_compact() {
        assert!(!can_pretty_print());
        let pretty = serialize(&sample(), &FormatOptions::utc().with_pretty(true)).unwrap();
        let compact = serialize(&sample(), &FormatOptions::utc()).unwrap();
        assert_eq!(pretty, compact);
    }

    #[test]
    fn test_write_atomically() {
        let dir = std::env::temp_dir().join("feedformat_writer_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("feed.xml");

        write_atomically("<rss/>", &path).unwrap();
        write_atomically("<feed/>", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<feed/>");

        let leftovers = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);

        std::fs::remove_dir_all(&dir).ok();
    }
}
