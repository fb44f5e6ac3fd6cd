use chrono::FixedOffset;

use super::{has_field, resource_link, Dialect, DialectFormatter};
use crate::feed::builder::{build, Element};
use crate::feed::error::{FormatError, ValidationError};
use crate::feed::mapping::{RSS1_CHANNEL, RSS1_ENTRY};
use crate::feed::value::{FeedChannel, FeedEntry};

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RSS1_NS: &str = "http://purl.org/rss/1.0/";

/// RSS 1.0 (RDF Site Summary).
///
/// Items live beside the channel rather than inside it; the channel lists
/// them by URL in an `rdf:Seq`.
pub struct Rss1;

impl DialectFormatter for Rss1 {
    const DIALECT: Dialect = Dialect::Rss1;

    fn validate(channel: &FeedChannel, entries: &[FeedEntry]) -> Result<(), ValidationError> {
        for field in ["title", "link", "description"] {
            if !has_field(RSS1_CHANNEL, field, channel) {
                return Err(ValidationError::new(
                    Self::DIALECT,
                    format!("the channel element must contain a {} subelement", field),
                ));
            }
        }

        for (index, entry) in entries.iter().enumerate() {
            for field in ["title", "link"] {
                if !has_field(RSS1_ENTRY, field, entry) {
                    return Err(ValidationError::new(
                        Self::DIALECT,
                        format!("item {} must contain a {} subelement", index, field),
                    ));
                }
            }
        }
        Ok(())
    }

    fn render(
        channel: &FeedChannel,
        entries: &[FeedEntry],
        offset: Option<FixedOffset>,
    ) -> Result<Element, FormatError> {
        let mut root = Element::new("rdf:RDF")
            .with_attribute("xmlns:rdf", RDF_NS)
            .with_attribute("xmlns", RSS1_NS);

        let mut channel_el = about(Element::new("channel"), resource_link(RSS1_CHANNEL, channel));
        build(&mut channel_el, RSS1_CHANNEL, channel, offset)?;

        let mut seq = Element::new("rdf:Seq");
        for link in entries.iter().filter_map(|e| resource_link(RSS1_ENTRY, e)) {
            seq.push(Element::new("rdf:li").with_attribute("resource", link));
        }
        channel_el.push(Element::new("items").with_child(seq));
        root.push(channel_el);

        for entry in entries {
            let mut item = about(Element::new("item"), resource_link(RSS1_ENTRY, entry));
            build(&mut item, RSS1_ENTRY, entry, offset)?;
            root.push(item);
        }

        Ok(root)
    }
}

fn about(element: Element, link: Option<String>) -> Element {
    match link {
        Some(link) => element.with_attribute("rdf:about", link),
        None => element,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::value::FieldMap;

    fn utc() -> Option<FixedOffset> {
        FixedOffset::east_opt(0)
    }

    fn channel() -> FeedChannel {
        FieldMap::new()
            .with("title", "T")
            .with("link", "http://x/")
            .with("description", "D")
    }

    fn entry(n: u32) -> FeedEntry {
        FieldMap::new()
            .with("title", format!("I{n}"))
            .with("link", format!("http://x/{n}"))
    }

    #[test]
    fn test_validate_accepts_complete_feed() {
        assert!(Rss1::validate(&channel(), &[entry(1), entry(2)]).is_ok());
    }

    #[test]
    fn test_validate_requires_channel_fields() {
        for missing in ["title", "link", "description"] {
            let mut ch = FieldMap::new();
            for (k, v) in [("title", "T"), ("link", "http://x/"), ("description", "D")] {
                if k != missing {
                    ch.insert(k, v);
                }
            }
            let err = Rss1::validate(&ch, &[]).unwrap_err();
            assert!(err.reason.contains(missing), "{}", err);
        }
    }

    #[test]
    fn test_validate_requires_item_title_and_link() {
        let no_link = FieldMap::new().with("title", "I");
        let err = Rss1::validate(&channel(), &[entry(1), no_link]).unwrap_err();
        assert!(err.reason.contains("item 1"));
        assert!(err.reason.contains("link"));

        let no_title = FieldMap::new().with("link", "http://x/1");
        assert!(Rss1::validate(&channel(), &[no_title]).is_err());

        // description alone is not enough for RSS 1.0
        let description_only = FieldMap::new().with("description", "D");
        assert!(Rss1::validate(&channel(), &[description_only]).is_err());
    }

    #[test]
    fn test_render_structure() {
        let root = Rss1::render(&channel(), &[entry(1), entry(2)], utc()).unwrap();

        assert_eq!(root.name, "rdf:RDF");
        assert_eq!(root.attribute("xmlns:rdf"), Some(RDF_NS));
        assert_eq!(root.attribute("xmlns"), Some(RSS1_NS));

        let ch = root.child("channel").unwrap();
        assert_eq!(ch.attribute("rdf:about"), Some("http://x/"));
        let names: Vec<&str> = ch.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["title", "link", "description", "items"]);

        let seq = ch.child("items").unwrap().child("rdf:Seq").unwrap();
        let resources: Vec<&str> = seq
            .children_named("rdf:li")
            .filter_map(|li| li.attribute("resource"))
            .collect();
        assert_eq!(resources, vec!["http://x/1", "http://x/2"]);

        let items: Vec<&Element> = root.children_named("item").collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].attribute("rdf:about"), Some("http://x/2"));
        assert_eq!(items[1].child("title").unwrap().text.as_deref(), Some("I2"));
    }

    #[test]
    fn test_render_uses_url_synonym_for_about() {
        let ch = FieldMap::new()
            .with("title", "T")
            .with("url", "http://y/")
            .with("summary", "D");
        let root = Rss1::render(&ch, &[], utc()).unwrap();
        let ch = root.child("channel").unwrap();
        assert_eq!(ch.attribute("rdf:about"), Some("http://y/"));
        assert_eq!(ch.child("description").unwrap().text.as_deref(), Some("D"));
    }
}
