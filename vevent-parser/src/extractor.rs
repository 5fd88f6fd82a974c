//! Main extractor API
//!
//! The `EventExtractor` walks logical lines, assembles one `Event` per
//! boundary-delimited block and files it into a `CalendarIndex`.

use crate::config::ParserConfig;
use crate::index::CalendarIndex;
use crate::property::parse_property;
use crate::types::{Event, Result, VeventError};
use crate::unfold::{physical_lines, unfold};

/// The extractor - entry point for turning calendar text into an index
#[derive(Debug, Clone, Default)]
pub struct EventExtractor {
    config: ParserConfig,
}

impl EventExtractor {
    /// Create an extractor with the default VEVENT configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Get the active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Unfold raw calendar text and extract its events
    ///
    /// # Example
    /// ```
    /// use vevent_parser::EventExtractor;
    ///
    /// let raw = "BEGIN:VEVENT\r\nSUMMARY:Stand\r\n up\r\nDTSTART:20170118T090000\r\nEND:VEVENT\r\n";
    /// let index = EventExtractor::new().parse(raw).unwrap();
    /// assert_eq!(index.get(2017, 1, 18)[0].summary, "Standup");
    /// ```
    pub fn parse(&self, raw: &str) -> Result<CalendarIndex> {
        self.extract(&unfold(raw))
    }

    /// Extract events from already unfolded text
    ///
    /// Fails with `MalformedEvent` as soon as a block closes without a start
    /// timestamp; no index is returned in that case.
    pub fn extract(&self, unfolded: &str) -> Result<CalendarIndex> {
        let mut index = CalendarIndex::new();
        let mut current: Option<Event> = None;
        let mut skipped = 0usize;

        for (line_no, line) in physical_lines(unfolded).into_iter().enumerate() {
            if self.config.is_begin(line) {
                if current.is_some() {
                    log::warn!(
                        "Line {}: new event opened before the previous one closed, discarding it",
                        line_no + 1
                    );
                }
                current = Some(Event::new());
            } else if self.config.is_end(line) {
                let Some(event) = current.take() else {
                    log::trace!("Line {}: closing boundary outside an event", line_no + 1);
                    continue;
                };

                if event.start.is_none() {
                    if self.config.skip_events_without_start {
                        log::warn!(
                            "Line {}: skipping event without start ({:?})",
                            line_no + 1,
                            event.summary
                        );
                        skipped += 1;
                        continue;
                    }
                    return Err(VeventError::MalformedEvent {
                        line: line_no + 1,
                        summary: event.summary,
                    });
                }

                log::debug!("Indexing event {:?} at {:?}", event.summary, event.start);
                index.insert(event);
            } else if let Some(event) = current.as_mut() {
                match parse_property(line, self.config.unescape_text) {
                    Some(property) => event.set_field(&property.name, property.value),
                    None => log::trace!("Line {}: ignoring {:?}", line_no + 1, line),
                }
            }
        }

        if current.is_some() {
            log::warn!("Input ended inside an unclosed event, discarding it");
        }

        log::info!(
            "Extracted {} events over {} days ({} skipped)",
            index.len(),
            index.num_days(),
            skipped
        );

        Ok(index)
    }
}

/// Extract events from unfolded text with the default configuration
pub fn extract(unfolded: &str) -> Result<CalendarIndex> {
    EventExtractor::new().extract(unfolded)
}

/// Unfold and extract in one step with the default configuration
pub fn parse(raw: &str) -> Result<CalendarIndex> {
    EventExtractor::new().parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;
    use chrono::NaiveDate;

    const TWO_EVENTS: &str = "\
BEGIN:VCALENDAR
BEGIN:VEVENT
DTSTART:20170118T090000
DTEND:20170118T100000
SUMMARY:Algorithms
LOCATION:Hall A
UID:a1
END:VEVENT
BEGIN:VEVENT
DTSTART:20170118T120000Z
DTEND:20170118T130000Z
SUMMARY:Lunch
STATUS:CONFIRMED
END:VEVENT
END:VCALENDAR";

    #[test]
    fn test_extract_two_events() {
        let index = extract(TWO_EVENTS).unwrap();
        let day = index.get(2017, 1, 18);
        assert_eq!(day.len(), 2);

        assert_eq!(day[0].summary, "Algorithms");
        assert_eq!(day[0].location, "Hall A");
        assert_eq!(day[0].field("uid"), Some(FieldValue::Text("a1".into())));
        assert_eq!(
            day[1].start,
            NaiveDate::from_ymd_opt(2017, 1, 18).unwrap().and_hms_opt(12, 0, 0)
        );
        assert_eq!(day[1].field("status"), Some(FieldValue::Text("CONFIRMED".into())));
    }

    #[test]
    fn test_missing_start_is_malformed() {
        let text = "BEGIN:VEVENT\nSUMMARY:Nowhere\nEND:VEVENT";
        assert_eq!(
            extract(text),
            Err(VeventError::MalformedEvent {
                line: 3,
                summary: "Nowhere".into()
            })
        );
    }

    #[test]
    fn test_error_aborts_whole_document() {
        let text = format!("{}\nBEGIN:VEVENT\nEND:VEVENT", TWO_EVENTS);
        assert!(extract(&text).is_err());
    }

    #[test]
    fn test_skip_events_without_start() {
        let text = format!("BEGIN:VEVENT\nSUMMARY:x\nEND:VEVENT\n{}", TWO_EVENTS);
        let extractor = EventExtractor::with_config(
            ParserConfig::new().with_skip_events_without_start(true),
        );
        let index = extractor.extract(&text).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_lines_outside_events_are_ignored() {
        let text = "SUMMARY:orphan\nDTSTART:20170101T000000\nEND:VEVENT\nBEGIN:VEVENT\nDTSTART:20170102T000000\nEND:VEVENT";
        let index = extract(text).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get(2017, 1, 1).is_empty());
        assert_eq!(index.get(2017, 1, 2)[0].summary, "");
    }

    #[test]
    fn test_reopened_event_discards_previous() {
        let text = "\
BEGIN:VEVENT
DTSTART:20170101T090000
SUMMARY:lost
BEGIN:VEVENT
DTSTART:20170102T090000
SUMMARY:kept
END:VEVENT";
        let index = extract(text).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(2017, 1, 2)[0].summary, "kept");
    }

    #[test]
    fn test_unclosed_event_is_dropped() {
        let index = extract("BEGIN:VEVENT\nDTSTART:20170101T090000").unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_boundary_tokens_need_exact_match() {
        let text = "BEGIN:VEVENT \nDTSTART:20170101T090000\nEND:VEVENT";
        assert!(extract(text).unwrap().is_empty());
    }

    #[test]
    fn test_custom_boundary_tokens() {
        let text = "BEGIN:VTODO\nDTSTART:20170105T080000\nSUMMARY:Chores\nEND:VTODO";
        let extractor = EventExtractor::with_config(
            ParserConfig::new().with_boundary_tokens("BEGIN:VTODO", "END:VTODO"),
        );
        let index = extractor.extract(text).unwrap();
        assert_eq!(index.get(2017, 1, 5)[0].summary, "Chores");
        assert!(extract(text).unwrap().is_empty());
    }

    #[test]
    fn test_later_property_overwrites_earlier() {
        let text = "BEGIN:VEVENT\nDTSTART:20170101T090000\nDTSTART:20170103T090000\nEND:VEVENT";
        let index = extract(text).unwrap();
        assert!(index.get(2017, 1, 1).is_empty());
        assert_eq!(index.get(2017, 1, 3).len(), 1);
    }

    #[test]
    fn test_text_values_ending_in_timestamps_are_kept() {
        let text = "\
BEGIN:VEVENT
DTSTART:20170118T090000
DESCRIPTION:Ref:20170118T090000
SUMMARY:Sync at 10:20170118T100000
END:VEVENT";
        let index = extract(text).unwrap();
        let event = &index.get(2017, 1, 18)[0];
        assert_eq!(event.description, "Ref:20170118T090000");
        assert_eq!(event.summary, "Sync at 10:20170118T100000");
    }

    #[test]
    fn test_parse_unfolds_first() {
        let raw = "BEGIN:VEVENT\r\nDTSTART:20170118T090000\r\nDESCRIPTION:first\\nsec\r\n ond\r\nEND:VEVENT\r\n";
        let index = parse(raw).unwrap();
        assert_eq!(index.get(2017, 1, 18)[0].description, "first\nsecond");
    }
}
