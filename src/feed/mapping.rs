//! Declarative field mapping tables.
//!
//! Each dialect has one table for channel-level fields and one for
//! entry-level fields. A table is an ordered list of [`MappingRule`]s; the
//! element builder walks it in order, so the table alone decides which
//! elements a dialect emits and in which order.

use chrono::FixedOffset;

use super::error::TransformError;
use super::normalize;
use super::value::{FieldMap, Record, Value};

/// Result of resolving one rule against a source map.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Rendered as element text.
    Scalar(String),
    /// Rendered as nested child elements (or attributes for `link`).
    Record(Record),
    /// The transform decided the element must not be emitted.
    Suppressed,
}

impl Resolved {
    /// Untransformed pass-through of a raw value.
    pub fn from_raw(raw: &Value) -> Self {
        match raw {
            Value::Record(record) => Resolved::Record(record.clone()),
            other => Resolved::Scalar(other.as_text().unwrap_or_default()),
        }
    }
}

/// Value transforms referenced by the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Rss2Date,
    AtomDate,
    Rss2Author,
    AtomAuthor,
    AtomLink,
    AtomId,
}

impl Transform {
    /// Applies the transform. `offset` is the zone local times are shown in;
    /// `None` means the system zone in effect at each instant.
    pub fn apply(
        self,
        raw: &Value,
        offset: Option<FixedOffset>,
    ) -> Result<Resolved, TransformError> {
        match self {
            Transform::Rss2Date => normalize::format_rss2_date(raw, offset).map(Resolved::Scalar),
            Transform::AtomDate => normalize::format_atom_date(raw, offset).map(Resolved::Scalar),
            Transform::Rss2Author => Ok(normalize::rss2_author(raw)),
            Transform::AtomAuthor => Ok(normalize::atom_author(raw)),
            Transform::AtomLink => Ok(normalize::atom_link(raw)),
            Transform::AtomId => normalize::atom_id(raw),
        }
    }
}

/// One row of a mapping table.
#[derive(Debug, Clone, Copy)]
pub struct MappingRule {
    /// Accepted input keys, most preferred first.
    pub keys: &'static [&'static str],
    /// Output element name.
    pub output: &'static str,
    pub transform: Option<Transform>,
}

impl MappingRule {
    const fn plain(keys: &'static [&'static str], output: &'static str) -> Self {
        Self {
            keys,
            output,
            transform: None,
        }
    }

    const fn transformed(
        keys: &'static [&'static str],
        output: &'static str,
        transform: Transform,
    ) -> Self {
        Self {
            keys,
            output,
            transform: Some(transform),
        }
    }

    /// First accepted key present in `source`, with its value.
    pub fn find<'a>(&self, source: &'a FieldMap) -> Option<(&'static str, &'a Value)> {
        self.keys
            .iter()
            .find_map(|key| source.get(key).map(|value| (*key, value)))
    }

    /// Looks up the source value and applies the transform, if any.
    ///
    /// Returns `Ok(None)` when no accepted key is present.
    pub fn resolve(
        &self,
        source: &FieldMap,
        offset: Option<FixedOffset>,
    ) -> Result<Option<Resolved>, TransformError> {
        let Some((_, raw)) = self.find(source) else {
            return Ok(None);
        };
        let resolved = match self.transform {
            Some(transform) => transform.apply(raw, offset)?,
            None => Resolved::from_raw(raw),
        };
        Ok(Some(resolved))
    }
}

/// Looks up the rule emitting `output` in `table`.
pub fn rule_for<'t>(table: &'t [MappingRule], output: &str) -> Option<&'t MappingRule> {
    table.iter().find(|rule| rule.output == output)
}

const TITLE: &[&str] = &["title"];
const LINK: &[&str] = &["link", "url"];
const DESCRIPTION: &[&str] = &["description", "desc", "summary"];
const DATE: &[&str] = &["pubDate", "pubdate", "date", "published", "updated"];
const CATEGORY: &[&str] = &["category"];
const AUTHOR: &[&str] = &["author"];

pub static RSS1_CHANNEL: &[MappingRule] = &[
    MappingRule::plain(TITLE, "title"),
    MappingRule::plain(LINK, "link"),
    MappingRule::plain(DESCRIPTION, "description"),
];

pub static RSS1_ENTRY: &[MappingRule] = &[
    MappingRule::plain(TITLE, "title"),
    MappingRule::plain(LINK, "link"),
    MappingRule::plain(DESCRIPTION, "description"),
];

pub static RSS2_CHANNEL: &[MappingRule] = &[
    MappingRule::plain(TITLE, "title"),
    MappingRule::plain(LINK, "link"),
    MappingRule::plain(DESCRIPTION, "description"),
    MappingRule::transformed(DATE, "pubDate", Transform::Rss2Date),
    MappingRule::plain(CATEGORY, "category"),
    MappingRule::plain(&["language"], "language"),
    MappingRule::plain(&["copyright"], "copyright"),
    MappingRule::plain(&["webMaster"], "webmaster"),
    MappingRule::plain(&["image"], "image"),
    MappingRule::plain(&["skipHours"], "skipHours"),
    MappingRule::plain(&["skipDays"], "skipDays"),
    MappingRule::plain(&["ttl"], "ttl"),
];

pub static RSS2_ENTRY: &[MappingRule] = &[
    MappingRule::plain(TITLE, "title"),
    MappingRule::plain(LINK, "link"),
    MappingRule::plain(DESCRIPTION, "description"),
    MappingRule::plain(&["guid", "id"], "guid"),
    MappingRule::transformed(DATE, "pubDate", Transform::Rss2Date),
    MappingRule::plain(CATEGORY, "category"),
    MappingRule::transformed(AUTHOR, "author", Transform::Rss2Author),
];

pub static ATOM_FEED: &[MappingRule] = &[
    MappingRule::plain(TITLE, "title"),
    MappingRule::transformed(LINK, "id", Transform::AtomId),
    MappingRule::plain(DESCRIPTION, "subtitle"),
    MappingRule::transformed(DATE, "updated", Transform::AtomDate),
    MappingRule::plain(CATEGORY, "category"),
    MappingRule::transformed(AUTHOR, "author", Transform::AtomAuthor),
];

pub static ATOM_ENTRY: &[MappingRule] = &[
    MappingRule::plain(TITLE, "title"),
    MappingRule::transformed(LINK, "id", Transform::AtomId),
    MappingRule::transformed(LINK, "link", Transform::AtomLink),
    MappingRule::plain(DESCRIPTION, "summary"),
    MappingRule::transformed(DATE, "updated", Transform::AtomDate),
    MappingRule::plain(CATEGORY, "category"),
    MappingRule::transformed(AUTHOR, "author", Transform::AtomAuthor),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> Option<FixedOffset> {
        FixedOffset::east_opt(0)
    }

    #[test]
    fn test_first_accepted_key_wins() {
        let source = FieldMap::new()
            .with("summary", "from summary")
            .with("description", "from description");
        let rule = rule_for(RSS2_CHANNEL, "description").unwrap();
        assert_eq!(
            rule.resolve(&source, utc()).unwrap(),
            Some(Resolved::Scalar("from description".into()))
        );
    }

    #[test]
    fn test_synonym_used_when_preferred_key_absent() {
        let source = FieldMap::new().with("desc", "short");
        let rule = rule_for(RSS1_ENTRY, "description").unwrap();
        assert_eq!(rule.find(&source).map(|(k, _)| k), Some("desc"));
    }

    #[test]
    fn test_missing_keys_resolve_to_nothing() {
        let rule = rule_for(RSS2_ENTRY, "guid").unwrap();
        assert_eq!(rule.resolve(&FieldMap::new(), utc()).unwrap(), None);
    }

    #[test]
    fn test_transform_applied() {
        let source = FieldMap::new().with("published", 1_700_000_000i64);
        let rule = rule_for(RSS2_ENTRY, "pubDate").unwrap();
        assert_eq!(
            rule.resolve(&source, utc()).unwrap(),
            Some(Resolved::Scalar("Tue, 14 Nov 2023 22:13:20 UT".into()))
        );
    }

    #[test]
    fn test_transform_error_propagates() {
        let source = FieldMap::new().with("date", "soon");
        let rule = rule_for(ATOM_ENTRY, "updated").unwrap();
        assert!(rule.resolve(&source, utc()).is_err());
    }

    #[test]
    fn test_untransformed_values_pass_through() {
        assert_eq!(
            Resolved::from_raw(&Value::Integer(10)),
            Resolved::Scalar("10".into())
        );
        let record = Record::single("url", "http://x/logo.png");
        assert_eq!(
            Resolved::from_raw(&Value::Record(record.clone())),
            Resolved::Record(record)
        );
    }

    #[test]
    fn test_atom_entry_uses_link_twice() {
        let outputs: Vec<&str> = ATOM_ENTRY
            .iter()
            .filter(|rule| rule.keys == LINK)
            .map(|rule| rule.output)
            .collect();
        assert_eq!(outputs, vec!["id", "link"]);
    }

    #[test]
    fn test_atom_id_takes_href_of_link_record() {
        let link = Record::new().with("href", "http://x/1").with("rel", "alternate");
        let source = FieldMap::new().with("link", Value::Record(link));
        for table in [ATOM_FEED, ATOM_ENTRY] {
            let rule = rule_for(table, "id").unwrap();
            assert_eq!(
                rule.resolve(&source, utc()).unwrap(),
                Some(Resolved::Scalar("http://x/1".into()))
            );
        }
    }
}
