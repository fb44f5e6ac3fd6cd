//! Dialect formatters.
//!
//! Each dialect is a stateless [`DialectFormatter`]: it validates the
//! caller's data, lays out the dialect's document skeleton, and fills it in
//! by running the element builder over the matching mapping tables.

mod atom;
mod rss1;
mod rss2;

pub use atom::Atom;
pub use rss1::Rss1;
pub use rss2::Rss2;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::builder::Element;
use super::error::{FormatError, ValidationError};
use super::mapping::{rule_for, MappingRule};
use super::value::{FeedChannel, FeedEntry, FieldMap, Value};

/// Output dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Rss1,
    #[default]
    Rss2,
    Atom,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Rss1, Dialect::Rss2, Dialect::Atom];

    /// Checks the required fields for this dialect.
    pub fn validate(self, channel: &FeedChannel, entries: &[FeedEntry]) -> Result<(), ValidationError> {
        match self {
            Dialect::Rss1 => Rss1::validate(channel, entries),
            Dialect::Rss2 => Rss2::validate(channel, entries),
            Dialect::Atom => Atom::validate(channel, entries),
        }
    }

    /// Builds the document tree. Does not validate.
    pub fn render(
        self,
        channel: &FeedChannel,
        entries: &[FeedEntry],
        offset: Option<FixedOffset>,
    ) -> Result<Element, FormatError> {
        match self {
            Dialect::Rss1 => Rss1::render(channel, entries, offset),
            Dialect::Rss2 => Rss2::render(channel, entries, offset),
            Dialect::Atom => Atom::render(channel, entries, offset),
        }
    }

    /// Short name used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Rss1 => "rss1",
            Dialect::Rss2 => "rss2",
            Dialect::Atom => "atom",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Rss1 => "RSS 1.0",
            Dialect::Rss2 => "RSS 2.0",
            Dialect::Atom => "Atom 1.0",
        })
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rss1" | "rss1.0" | "rdf" => Ok(Dialect::Rss1),
            "rss2" | "rss2.0" | "rss" => Ok(Dialect::Rss2),
            "atom" | "atom1.0" => Ok(Dialect::Atom),
            other => Err(format!("unknown feed dialect '{}'", other)),
        }
    }
}

/// A stateless formatter for one dialect.
pub trait DialectFormatter {
    const DIALECT: Dialect;

    /// Rejects input missing a field the dialect requires.
    fn validate(channel: &FeedChannel, entries: &[FeedEntry]) -> Result<(), ValidationError>;

    /// Lays out the document tree for this dialect.
    fn render(
        channel: &FeedChannel,
        entries: &[FeedEntry],
        offset: Option<FixedOffset>,
    ) -> Result<Element, FormatError>;
}

/// True when any accepted key of the rule emitting `output` is present.
fn has_field(table: &[MappingRule], output: &str, source: &FieldMap) -> bool {
    rule_for(table, output).is_some_and(|rule| rule.find(source).is_some())
}

/// The URL a resource is addressed by, taken through the `link` rule of
/// `table`. Link records contribute their `href`.
fn resource_link(table: &[MappingRule], source: &FieldMap) -> Option<String> {
    let (_, value) = rule_for(table, "link")?.find(source)?;
    match value {
        Value::Record(record) => record.get("href").map(str::to_string),
        other => other.as_text(),
    }
}
