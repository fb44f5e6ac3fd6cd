//! Document tree and the table-driven element builder.
//!
//! The builder walks a [`MappingRule`] table against a [`FieldMap`] and
//! appends one child per resolved rule. Two element names get special
//! treatment that feed readers expect:
//!
//! - `link` with a record value becomes an attribute-only element
//!   (`<link href="..."/>`)
//! - `guid` whose text does not start with `http` is marked
//!   `isPermaLink="false"`
//!
//! Record keys become element and attribute names, so they are checked
//! against the XML `Name` production (with at most one `prefix:` part)
//! before anything is appended.

use chrono::FixedOffset;

use super::error::{FormatError, TransformError};
use super::mapping::{MappingRule, Resolved};
use super::value::{FieldMap, Record};

/// One XML element of the intermediate document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children named `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Appends one child to `parent` for every rule in `table` that resolves
/// against `source`, in table order.
///
/// Transform failures abort immediately; `parent` may then hold a partial
/// set of children and must be discarded by the caller.
pub fn build(
    parent: &mut Element,
    table: &[MappingRule],
    source: &FieldMap,
    offset: Option<FixedOffset>,
) -> Result<(), FormatError> {
    for rule in table {
        if let Some(resolved) = rule.resolve(source, offset)? {
            append(parent, rule.output, resolved)?;
        }
    }
    Ok(())
}

/// Appends a single resolved value to `parent` as an element named `name`.
pub fn append(parent: &mut Element, name: &str, value: Resolved) -> Result<(), FormatError> {
    if !matches!(value, Resolved::Suppressed) {
        check_name(name)?;
    }
    match value {
        Resolved::Suppressed => {}
        Resolved::Record(record) if name == "link" => parent.push(link_element(&record)?),
        Resolved::Record(record) => {
            let mut child = Element::new(name);
            for (key, text) in record.iter() {
                append(&mut child, key, Resolved::Scalar(text.to_string()))?;
            }
            parent.push(child);
        }
        Resolved::Scalar(text) if name == "guid" && !text.starts_with("http") => {
            parent.push(
                Element::new(name)
                    .with_attribute("isPermaLink", "false")
                    .with_text(text),
            );
        }
        Resolved::Scalar(text) => parent.push(Element::new(name).with_text(text)),
    }
    Ok(())
}

fn link_element(record: &Record) -> Result<Element, TransformError> {
    let href = record.get("href").ok_or(TransformError::LinkWithoutHref)?;
    let mut link = Element::new("link").with_attribute("href", href);
    for (key, value) in record.iter().filter(|(k, _)| *k != "href") {
        check_name(key)?;
        link = link.with_attribute(key, value);
    }
    Ok(link)
}

/// Accepts `local` or `prefix:local`, each part an XML name without colons.
pub fn check_name(name: &str) -> Result<(), TransformError> {
    let valid = match name.split_once(':') {
        Some((prefix, local)) => is_ncname(prefix) && is_ncname(local),
        None => is_ncname(name),
    };
    if valid {
        Ok(())
    } else {
        Err(TransformError::InvalidName(name.to_string()))
    }
}

fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}
