//! Value normalizers: pure functions that turn heterogeneous date and author
//! representations into the canonical form each dialect expects.

use chrono::{FixedOffset, Local, NaiveDateTime, TimeZone};

use super::error::TransformError;
use super::mapping::Resolved;
use super::value::{Record, Value};

const RFC822_LIKE: &str = "%a, %d %b %Y %H:%M:%S";

// ============================================================================
// Dates
// ============================================================================

/// Converts any accepted date representation into calendar time plus the
/// offset that time is expressed in.
///
/// `zone` is a fixed offset, or `None` for the system zone, in which case the
/// offset is the one in effect at that instant (so daylight saving applies).
///
/// Accepted inputs:
/// - `Value::Time`, taken as already local
/// - `Value::Integer` / `Value::Float`, seconds since the Unix epoch
/// - text holding a number of epoch seconds
/// - text in the form `"Tue, 14 Nov 2023 22:13:20 GMT"`; the zone name is
///   skipped and the clock reading is kept as local time
pub fn to_local_time(
    raw: &Value,
    zone: Option<FixedOffset>,
) -> Result<(NaiveDateTime, FixedOffset), TransformError> {
    match raw {
        Value::Time(t) => Ok((*t, offset_at_local(*t, zone))),
        Value::Integer(secs) => from_epoch(*secs as f64, zone, raw),
        Value::Float(secs) => from_epoch(*secs, zone, raw),
        Value::Text(text) => {
            let text = text.trim();
            if let Ok(secs) = text.parse::<f64>() {
                if secs.is_finite() {
                    return from_epoch(secs, zone, raw);
                }
            }
            let local = parse_rfc822_like(text).ok_or_else(|| unrecognized(raw))?;
            Ok((local, offset_at_local(local, zone)))
        }
        Value::Record(_) => Err(unrecognized(raw)),
    }
}

/// Formats a date for RSS 2.0: `"Tue, 14 Nov 2023 22:13:20 UT"`.
pub fn format_rss2_date(
    raw: &Value,
    zone: Option<FixedOffset>,
) -> Result<String, TransformError> {
    let (local, _) = to_local_time(raw, zone)?;
    Ok(local.format("%a, %d %b %Y %H:%M:%S UT").to_string())
}

/// Formats a date for Atom: local ISO-8601 time with an explicit offset,
/// e.g. `"2023-11-15T03:43:20+05:30"`.
pub fn format_atom_date(
    raw: &Value,
    zone: Option<FixedOffset>,
) -> Result<String, TransformError> {
    let (local, offset) = to_local_time(raw, zone)?;
    Ok(format!(
        "{}{}",
        local.format("%Y-%m-%dT%H:%M:%S"),
        utc_offset_suffix(offset)
    ))
}

/// Renders a zone offset as `+HH:MM` / `-HH:MM`.
pub fn utc_offset_suffix(offset: FixedOffset) -> String {
    // The platform convention stores seconds west of UTC; flip it.
    let seconds = -offset.utc_minus_local();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

fn from_epoch(
    secs: f64,
    zone: Option<FixedOffset>,
    raw: &Value,
) -> Result<(NaiveDateTime, FixedOffset), TransformError> {
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return Err(unrecognized(raw));
    }
    let local = match zone {
        Some(offset) => offset
            .timestamp_opt(whole as i64, nanos)
            .single()
            .map(|dt| (dt.naive_local(), *dt.offset())),
        None => Local
            .timestamp_opt(whole as i64, nanos)
            .single()
            .map(|dt| (dt.naive_local(), *dt.offset())),
    };
    local.ok_or_else(|| unrecognized(raw))
}

/// Offset of a wall-clock reading. In the system zone a reading inside a
/// spring-forward gap takes the offset in effect at that UTC instant.
fn offset_at_local(local: NaiveDateTime, zone: Option<FixedOffset>) -> FixedOffset {
    match zone {
        Some(offset) => offset,
        None => match Local.from_local_datetime(&local).earliest() {
            Some(dt) => *dt.offset(),
            None => Local.offset_from_utc_datetime(&local),
        },
    }
}

fn parse_rfc822_like(text: &str) -> Option<NaiveDateTime> {
    if let Ok(t) = NaiveDateTime::parse_from_str(text, RFC822_LIKE) {
        return Some(t);
    }
    let (clock, zone) = text.rsplit_once(char::is_whitespace)?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    NaiveDateTime::parse_from_str(clock.trim_end(), RFC822_LIKE).ok()
}

fn unrecognized(raw: &Value) -> TransformError {
    let shown = match raw {
        Value::Record(_) => "<record>".to_string(),
        other => other.as_text().unwrap_or_default(),
    };
    TransformError::UnrecognizedTime(shown)
}

// ============================================================================
// Authors and links
// ============================================================================

/// Converts an author into an Atom person construct.
///
/// Records pass through. Text is classified: a URI when it starts with
/// `http://` or `www`, an email when it contains both `@` and `.`, and a
/// plain name otherwise.
pub fn atom_author(raw: &Value) -> Resolved {
    match raw {
        Value::Record(record) => Resolved::Record(record.clone()),
        other => {
            let text = other.as_text().unwrap_or_default();
            let key = if text.starts_with("http://") || text.starts_with("www") {
                "uri"
            } else if looks_like_email(&text) {
                "email"
            } else {
                "name"
            };
            Resolved::Record(Record::single(key, text))
        }
    }
}

/// Reduces an author to the bare email address RSS 2.0 expects, or
/// suppresses the element when there is none.
pub fn rss2_author(raw: &Value) -> Resolved {
    match raw {
        Value::Record(record) => record
            .get("email")
            .map(|email| Resolved::Scalar(email.to_string()))
            .unwrap_or(Resolved::Suppressed),
        other => match other.as_text() {
            Some(text) if looks_like_email(&text) => Resolved::Scalar(text),
            _ => Resolved::Suppressed,
        },
    }
}

/// Wraps a plain URL as an Atom link `{href}`; records pass through unchanged.
pub fn atom_link(raw: &Value) -> Resolved {
    match raw {
        Value::Record(record) => Resolved::Record(record.clone()),
        other => Resolved::Record(Record::single("href", other.as_text().unwrap_or_default())),
    }
}

/// Reduces a link to the bare URL an Atom `id` holds. A record contributes
/// its `href`.
pub fn atom_id(raw: &Value) -> Result<Resolved, TransformError> {
    match raw {
        Value::Record(record) => record
            .get("href")
            .map(|href| Resolved::Scalar(href.to_string()))
            .ok_or(TransformError::LinkWithoutHref),
        other => Ok(Resolved::Scalar(other.as_text().unwrap_or_default())),
    }
}

fn looks_like_email(text: &str) -> bool {
    text.contains('@') && text.contains('.')
}
