use thiserror::Error;

use super::Dialect;

/// A feed cannot be formatted as the requested dialect because a required
/// field is missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {dialect} feed: {reason}")]
pub struct ValidationError {
    pub dialect: Dialect,
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(dialect: Dialect, reason: impl Into<String>) -> Self {
        Self {
            dialect,
            reason: reason.into(),
        }
    }
}

/// A value normalizer could not interpret its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("unrecognized time format: {0}")]
    UnrecognizedTime(String),

    /// A record-valued `link` must carry the `href` attribute.
    #[error("link record has no href field")]
    LinkWithoutHref,

    /// A record key cannot be used as an XML element or attribute name.
    #[error("not a valid XML name: {0:?}")]
    InvalidName(String),
}

/// Errors that can occur while formatting a feed.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to transform field value: {0}")]
    Transform(#[from] TransformError),

    /// The XML writer rejected an event.
    #[error("XML write error: {0}")]
    Xml(String),

    #[error("Failed to write feed file: {0}")]
    Io(#[from] std::io::Error),
}
