use serde::Deserialize;
use std::path::Path;

use super::builder::Element;
use super::error::FormatError;
use super::formats::Dialect;
use super::options::FormatOptions;
use super::value::{FeedChannel, FeedEntry};
use super::writer;

/// A complete feed description: channel metadata plus entries in output
/// order.
///
/// Deserializes from the "universal feed" layout
/// `{"feed": {...}, "items": [...]}`; `channel` and `entries` are accepted
/// as aliases.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Feed {
    #[serde(default, alias = "channel")]
    pub feed: FeedChannel,
    #[serde(default, alias = "entries")]
    pub items: Vec<FeedEntry>,
}

impl Feed {
    pub fn new(feed: FeedChannel, items: Vec<FeedEntry>) -> Self {
        Self { feed, items }
    }

    pub fn push(&mut self, item: FeedEntry) {
        self.items.push(item);
    }

    /// Checks the required fields for `dialect`.
    pub fn validate(&self, dialect: Dialect) -> Result<(), FormatError> {
        dialect.validate(&self.feed, &self.items)?;
        Ok(())
    }

    /// Builds the document tree, validating first unless
    /// `options.validate` is off.
    pub fn render(&self, dialect: Dialect, options: &FormatOptions) -> Result<Element, FormatError> {
        if options.validate {
            self.validate(dialect)?;
        }
        let tree = dialect.render(&self.feed, &self.items, options.utc_offset)?;
        tracing::debug!(
            dialect = %dialect,
            entries = self.items.len(),
            "Rendered feed document"
        );
        Ok(tree)
    }

    /// Formats the feed as `dialect` and returns the XML text.
    pub fn to_xml_string(&self, dialect: Dialect, options: &FormatOptions) -> Result<String, FormatError> {
        let tree = self.render(dialect, options)?;
        writer::serialize(&tree, options)
    }

    /// Formats the feed and writes it to `path` atomically.
    pub fn write_to_file(
        &self,
        dialect: Dialect,
        path: &Path,
        options: &FormatOptions,
    ) -> Result<(), FormatError> {
        let content = self.to_xml_string(dialect, options)?;
        writer::write_atomically(&content, path)
    }

    pub fn to_rss1_string(&self, options: &FormatOptions) -> Result<String, FormatError> {
        self.to_xml_string(Dialect::Rss1, options)
    }

    pub fn to_rss2_string(&self, options: &FormatOptions) -> Result<String, FormatError> {
        self.to_xml_string(Dialect::Rss2, options)
    }

    pub fn to_atom_string(&self, options: &FormatOptions) -> Result<String, FormatError> {
        self.to_xml_string(Dialect::Atom, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::value::FieldMap;

    #[test]
    fn test_deserialize_universal_layout() {
        let feed: Feed = serde_json::from_str(
            r#"{"feed": {"title": "T"}, "items": [{"title": "a"}, {"title": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(feed.feed.len(), 1);
        assert_eq!(feed.items.len(), 2);
    }

    #[test]
    fn test_deserialize_aliases() {
        let feed: Feed =
            serde_json::from_str(r#"{"channel": {"title": "T"}, "entries": [{}]}"#).unwrap();
        assert!(feed.feed.contains("title"));
        assert_eq!(feed.items.len(), 1);
    }

    #[test]
    fn test_validation_runs_before_render() {
        let feed = Feed::new(FieldMap::new().with("title", "T"), vec![]);
        let err = feed.to_rss2_string(&FormatOptions::utc()).unwrap_err();
        assert!(matches!(err, FormatError::Validation(_)));
    }

    #[test]
    fn test_validation_can_be_skipped() {
        let feed = Feed::new(FieldMap::new().with("title", "T"), vec![]);
        let options = FormatOptions::utc().with_validate(false);
        let out = feed.to_rss2_string(&options).unwrap();
        assert_eq!(out, r#"<rss version="2.0"><channel><title>T</title></channel></rss>"#);
    }

    #[test]
    fn test_transform_error_returns_no_output() {
        let mut feed = Feed::new(
            FieldMap::new()
                .with("title", "T")
                .with("link", "http://x/")
                .with("description", "D"),
            vec![],
        );
        feed.push(FieldMap::new().with("title", "I").with("pubDate", "yesterday-ish"));
        let err = feed.to_rss2_string(&FormatOptions::utc()).unwrap_err();
        assert!(matches!(err, FormatError::Transform(_)));
    }

    #[test]
    fn test_write_to_file_matches_string() {
        let feed = Feed::new(
            FieldMap::new()
                .with("title", "T")
                .with("link", "http://x/")
                .with("description", "D")
                .with("author", "Ann"),
            vec![FieldMap::new().with("title", "I").with("link", "http://x/1")],
        );
        let dir = std::env::temp_dir().join("feedformat_document_test");
        std::fs::create_dir_all(&dir).unwrap();

        let options = FormatOptions::utc();
        for dialect in Dialect::ALL {
            let path = dir.join(format!("{}.xml", dialect.as_str()));
            feed.write_to_file(dialect, &path, &options).unwrap();
            let written = std::fs::read_to_string(&path).unwrap();
            assert_eq!(written, feed.to_xml_string(dialect, &options).unwrap());
        }

        std::fs::remove_dir_all(&dir).ok();
    }
}
