//! Property line tokenizing and value coercion
//!
//! A property line is `NAME[;params]:VALUE`. Values shaped like
//! `YYYYMMDDTHHMMSS[Z]` become naive timestamps (any `DT` prefix is dropped
//! from the name); everything else with a well-formed name becomes text.

use crate::types::{FieldValue, Timestamp};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

// Any line whose value is a bare timestamp, whatever its name looks like
static RE_TIMESTAMP_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+:[0-9]{8}T[0-9]{6}Z?$").expect("valid timestamp value regex"));
static RE_TIMESTAMP_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:DT)?([A-Z\-]+)(?:;[^:]+)?:([0-9]{8}T[0-9]{6})Z?$")
        .expect("valid timestamp property regex")
});
static RE_TEXT_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z\-]+)(?:;[^:]+)?:(.+)$").expect("valid text property regex")
});

/// A tokenized property line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Lowercase field name
    pub name: String,
    /// Coerced value
    pub value: FieldValue,
}

/// Tokenize one logical line into a property
///
/// Returns `None` for lines that match neither grammar. A line whose value is
/// a bare timestamp that does not hold a real calendar date is also dropped.
pub fn parse_property(line: &str, unescape_text: bool) -> Option<Property> {
    // A timestamp-looking tail under a name the timestamp grammar rejects
    // (e.g. "DESCRIPTION:Ref:20170118T090000") is still a text property
    let timestamp = RE_TIMESTAMP_VALUE
        .is_match(line)
        .then(|| RE_TIMESTAMP_PROPERTY.captures(line))
        .flatten();

    if let Some(caps) = timestamp {
        let stamp = &caps[2];
        return match parse_stamp(stamp) {
            Some(t) => Some(Property {
                name: caps[1].to_lowercase(),
                value: FieldValue::Timestamp(t),
            }),
            None => {
                log::warn!("Ignoring invalid timestamp {:?} in line {:?}", stamp, line);
                None
            }
        };
    }

    let caps = RE_TEXT_PROPERTY.captures(line)?;
    let text = if unescape_text {
        unescape(&caps[2])
    } else {
        caps[2].to_string()
    };
    Some(Property {
        name: caps[1].to_lowercase(),
        value: FieldValue::Text(text),
    })
}

/// Parse the digits of `YYYYMMDDTHHMMSS` into a naive timestamp
///
/// Fixed-width slicing; `%Y` in a format string would read the year greedily.
pub fn parse_stamp(stamp: &str) -> Option<Timestamp> {
    let digits = stamp.get(..15).filter(|s| s.as_bytes()[8] == b'T')?;
    let field = |range: std::ops::Range<usize>| digits.get(range)?.parse::<u32>().ok();

    let year = i32::try_from(field(0..4)?).ok()?;
    NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)?
        .and_hms_opt(field(9..11)?, field(11..13)?, field(13..15)?)
}

/// Replace `\n` with a newline and `\,` with a comma
pub fn unescape(value: &str) -> String {
    value.replace(r"\n", "\n").replace(r"\,", ",")
}
