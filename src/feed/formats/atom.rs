use chrono::FixedOffset;

use super::{Dialect, DialectFormatter};
use crate::feed::builder::{build, Element};
use crate::feed::error::{FormatError, ValidationError};
use crate::feed::mapping::{ATOM_ENTRY, ATOM_FEED};
use crate::feed::value::{FeedChannel, FeedEntry};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Atom 1.0.
pub struct Atom;

impl DialectFormatter for Atom {
    const DIALECT: Dialect = Dialect::Atom;

    /// Atom needs an author for every entry, either inherited from the feed
    /// or given on the entry itself.
    fn validate(channel: &FeedChannel, entries: &[FeedEntry]) -> Result<(), ValidationError> {
        if channel.contains("author") {
            return Ok(());
        }
        match entries.iter().position(|entry| !entry.contains("author")) {
            Some(index) => Err(ValidationError::new(
                Self::DIALECT,
                format!(
                    "entry {} has no author and the feed element has none to inherit; \
                     give the feed an author or give every entry one",
                    index
                ),
            )),
            None => Ok(()),
        }
    }

    fn render(
        channel: &FeedChannel,
        entries: &[FeedEntry],
        offset: Option<FixedOffset>,
    ) -> Result<Element, FormatError> {
        let mut root = Element::new("feed").with_attribute("xmlns", ATOM_NS);
        build(&mut root, ATOM_FEED, channel, offset)?;

        for entry in entries {
            let mut entry_el = Element::new("entry");
            build(&mut entry_el, ATOM_ENTRY, entry, offset)?;
            root.push(entry_el);
        }

        Ok(root)
    }
}
