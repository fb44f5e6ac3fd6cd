//! Dates formatted in the system zone follow daylight saving per instant.
//!
//! Kept in its own test binary because it pins `TZ` for the whole process.
//! The zone is given as a POSIX rule so no tzdata files are needed.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use feedformat::feed::{Feed, FieldMap, FormatOptions, Value};

const CENTRAL_EUROPE: &str = "CET-1CEST,M3.5.0,M10.5.0/3";

fn channel() -> FieldMap {
    FieldMap::new()
        .with("title", "T")
        .with("link", "http://x/")
        .with("description", "D")
        .with("author", "Ann")
}

fn entry(date: impl Into<Value>) -> FieldMap {
    FieldMap::new()
        .with("title", "I")
        .with("link", "http://x/1")
        .with("pubDate", date)
}

fn dates(date: impl Into<Value> + Clone) -> (String, String) {
    let options = FormatOptions::default();
    let rss2 = Feed::new(channel(), vec![entry(date.clone())])
        .to_rss2_string(&options)
        .unwrap();
    let atom = Feed::new(channel(), vec![entry(date)])
        .to_atom_string(&options)
        .unwrap();
    let between = |doc: &str, open: &str, close: &str| {
        let start = doc.find(open).unwrap() + open.len();
        let end = start + doc[start..].find(close).unwrap();
        doc[start..end].to_string()
    };
    let entry_start = atom.find("<entry>").unwrap();
    (
        between(&rss2, "<pubDate>", "</pubDate>"),
        between(&atom[entry_start..], "<updated>", "</updated>"),
    )
}

#[test]
fn test_system_zone_offset_follows_each_instant() {
    std::env::set_var("TZ", CENTRAL_EUROPE);

    // November: standard time, UTC+1
    assert_eq!(
        dates(1_700_000_000i64),
        (
            "Tue, 14 Nov 2023 23:13:20 UT".to_string(),
            "2023-11-14T23:13:20+01:00".to_string()
        )
    );

    // June: summer time, UTC+2
    assert_eq!(
        dates(1_688_000_000i64),
        (
            "Thu, 29 Jun 2023 02:53:20 UT".to_string(),
            "2023-06-29T02:53:20+02:00".to_string()
        )
    );

    // Structured local times take the offset in effect on their own date.
    let winter = NaiveDate::from_ymd_opt(2023, 1, 10)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    assert_eq!(dates(Value::Time(winter)).1, "2023-01-10T08:00:00+01:00");
    let summer = NaiveDate::from_ymd_opt(2023, 7, 10)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    assert_eq!(dates(Value::Time(summer)).1, "2023-07-10T08:00:00+02:00");

    // A reading inside the spring-forward gap still formats.
    let gap = NaiveDate::from_ymd_opt(2023, 3, 26)
        .unwrap()
        .and_hms_opt(2, 30, 0)
        .unwrap();
    assert_eq!(dates(Value::Time(gap)).1, "2023-03-26T02:30:00+02:00");
}
