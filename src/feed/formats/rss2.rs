use chrono::FixedOffset;

use super::{has_field, Dialect, DialectFormatter};
use crate::feed::builder::{build, Element};
use crate::feed::error::{FormatError, ValidationError};
use crate::feed::mapping::{RSS2_CHANNEL, RSS2_ENTRY};
use crate::feed::value::{FeedChannel, FeedEntry};

/// RSS 2.0.
pub struct Rss2;

impl DialectFormatter for Rss2 {
    const DIALECT: Dialect = Dialect::Rss2;

    fn validate(channel: &FeedChannel, entries: &[FeedEntry]) -> Result<(), ValidationError> {
        for field in ["title", "link", "description"] {
            if !has_field(RSS2_CHANNEL, field, channel) {
                return Err(ValidationError::new(
                    Self::DIALECT,
                    format!("the channel element must contain a {} subelement", field),
                ));
            }
        }

        // Items only need one of title/description.
        for (index, entry) in entries.iter().enumerate() {
            if !has_field(RSS2_ENTRY, "title", entry) && !has_field(RSS2_ENTRY, "description", entry)
            {
                return Err(ValidationError::new(
                    Self::DIALECT,
                    format!(
                        "item {} must contain at least a title or description subelement",
                        index
                    ),
                ));
            }
        }
        Ok(())
    }

    fn render(
        channel: &FeedChannel,
        entries: &[FeedEntry],
        offset: Option<FixedOffset>,
    ) -> Result<Element, FormatError> {
        let mut channel_el = Element::new("channel");
        build(&mut channel_el, RSS2_CHANNEL, channel, offset)?;

        for entry in entries {
            let mut item = Element::new("item");
            build(&mut item, RSS2_ENTRY, entry, offset)?;
            channel_el.push(item);
        }

        Ok(Element::new("rss")
            .with_attribute("version", "2.0")
            .with_child(channel_el))
    }
}
