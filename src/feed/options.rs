use chrono::FixedOffset;

/// Settings for one format call.
///
/// Everything that affects output lives here; formatters read no process
/// state of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Check required fields before building the document.
    pub validate: bool,
    /// Indent the output. Only honoured when pretty-printing is available,
    /// see [`crate::feed::can_pretty_print`].
    pub pretty: bool,
    /// Spaces per nesting level in pretty mode.
    pub indent: usize,
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` before the root element.
    pub xml_declaration: bool,
    /// Zone used to turn epoch timestamps into local calendar time, and the
    /// offset written after Atom dates. `None` uses the system zone, with the
    /// offset in effect at each timestamp.
    pub utc_offset: Option<FixedOffset>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            validate: true,
            pretty: false,
            indent: 4,
            xml_declaration: false,
            utc_offset: None,
        }
    }
}

impl FormatOptions {
    /// Defaults with times expressed in UTC.
    pub fn utc() -> Self {
        Self {
            utc_offset: FixedOffset::east_opt(0),
            ..Self::default()
        }
    }

    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_xml_declaration(mut self, xml_declaration: bool) -> Self {
        self.xml_declaration = xml_declaration;
        self
    }

    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = Some(utc_offset);
        self
    }
}
