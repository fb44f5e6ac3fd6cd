//! Feed serialization: turn a loosely-typed feed description into RSS 1.0,
//! RSS 2.0 or Atom 1.0 XML.
//!
//! The module is organized as a pipeline:
//!
//! - [`value`] - the caller-facing data model ([`FieldMap`], [`Value`], [`Record`])
//! - [`mapping`] - declarative per-dialect field mapping tables
//! - [`normalize`] - date, author and link normalizers used by the tables
//! - [`builder`] - the table-driven element builder and document tree
//! - [`formats`] - one formatter per dialect (validation + document skeleton)
//! - [`writer`] - XML serialization and atomic file output
//!
//! Nothing here holds mutable state; every call is a pure transformation
//! and may run concurrently with any other.
//!
//! # Example
//!
//! ```
//! use feedformat::feed::{Feed, FieldMap, FormatOptions};
//!
//! let channel = FieldMap::new()
//!     .with("title", "T")
//!     .with("link", "http://x/")
//!     .with("description", "D");
//! let entry = FieldMap::new()
//!     .with("title", "I")
//!     .with("link", "http://x/1")
//!     .with("guid", "abc123");
//!
//! let xml = Feed::new(channel, vec![entry])
//!     .to_rss2_string(&FormatOptions::utc())
//!     .unwrap();
//! assert!(xml.contains(r#"<guid isPermaLink="false">abc123</guid>"#));
//! ```

pub mod builder;
mod document;
mod error;
pub mod formats;
pub mod mapping;
pub mod normalize;
mod options;
pub mod value;
pub mod writer;

pub use builder::Element;
pub use document::Feed;
pub use error::{FormatError, TransformError, ValidationError};
pub use formats::{Dialect, DialectFormatter};
pub use options::FormatOptions;
pub use value::{FeedChannel, FeedEntry, FieldMap, Record, Value};
pub use writer::can_pretty_print;
