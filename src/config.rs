//! Configuration file parser for ~/.config/feedformat/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::feed::{Dialect, FormatOptions};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid utc_offset '{0}': expected \"Z\", \"+HH:MM\" or \"-HH:MM\"")]
    InvalidOffset(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Output defaults for the `feedformat` binary.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Command-line flags override what is set here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dialect used when `--dialect` is not given.
    pub dialect: Dialect,

    /// Indent output.
    pub pretty: bool,

    /// Spaces per level when pretty printing.
    pub indent: usize,

    /// Check required fields before formatting.
    pub validate: bool,

    /// Emit an `<?xml ...?>` declaration.
    pub xml_declaration: bool,

    /// Fixed zone for dates, e.g. `"+02:00"`. Unset means the local zone.
    pub utc_offset: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Dialect::Rss2,
            pretty: false,
            indent: 4,
            validate: true,
            xml_declaration: false,
            utc_offset: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "dialect",
                "pretty",
                "indent",
                "validate",
                "xml_declaration",
                "utc_offset",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(dialect = %config.dialect, pretty = config.pretty, "Loaded configuration");
        Ok(config)
    }

    /// Converts the file settings into per-call format options.
    pub fn format_options(&self) -> Result<FormatOptions, ConfigError> {
        let mut options = FormatOptions::default()
            .with_pretty(self.pretty)
            .with_indent(self.indent)
            .with_validate(self.validate)
            .with_xml_declaration(self.xml_declaration);
        if let Some(ref offset) = self.utc_offset {
            options = options.with_utc_offset(parse_utc_offset(offset)?);
        }
        Ok(options)
    }
}

/// Parses `"Z"`, `"+HH:MM"` or `"-HH:MM"` into a fixed offset.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidOffset(s.to_string());
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match trimmed.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

// ============================================================================
// Tests
// ============================================================================
