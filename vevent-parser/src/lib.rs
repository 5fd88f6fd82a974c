//! VEVENT Parser Library
//!
//! A stateless library that turns the text of an iCalendar (.ics) document
//! into an in-memory, date-indexed collection of events.
//!
//! # Architecture
//!
//! Parsing is a one-way pipeline:
//! - Unfold continuation lines into logical lines
//! - Tokenize `NAME[;params]:VALUE` property lines and coerce their values
//! - Group lines between `BEGIN:VEVENT` and `END:VEVENT` into `Event` records
//! - File each event under the year/month/day of its start
//!
//! Only a minimal single-valued subset of RFC 5545 is understood. Timestamps
//! are naive wall-clock values; a trailing `Z` is accepted but never converted.
//!
//! The library does NOT:
//! - Read files or fetch calendars (callers pass in text)
//! - Expand recurrence rules or resolve timezones
//! - Write calendars back
//!
//! # Example Usage
//!
//! ```
//! use vevent_parser::parse;
//! use chrono::NaiveDate;
//!
//! let text = "\
//! BEGIN:VEVENT
//! DTSTART:20170118T090000
//! DTEND:20170118T100000
//! SUMMARY:Morning lecture
//! END:VEVENT";
//!
//! let index = parse(text).unwrap();
//! let day = NaiveDate::from_ymd_opt(2017, 1, 18).unwrap();
//! assert_eq!(index.events_on_day(day)[0].summary, "Morning lecture");
//!
//! let now = day.and_hms_opt(9, 30, 0).unwrap();
//! assert!(index.current_event(now).is_some());
//! assert!(index.next_event(now).is_none());
//! ```

// Public modules
pub mod config;
pub mod extractor;
pub mod index;
pub mod property;
pub mod types;
pub mod unfold;

// Re-export main types for convenience
pub use config::ParserConfig;
pub use extractor::{extract, parse, EventExtractor};
pub use index::{CalendarIndex, IndexStats};
pub use types::{Event, FieldValue, Result, Timestamp, VeventError};
pub use unfold::unfold;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: empty input yields an empty index
        let index = parse("").unwrap();
        assert_eq!(index.stats().num_events, 0);
    }
}
