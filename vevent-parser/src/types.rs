//! Core types for the VEVENT parser library
//!
//! This module defines the event record produced for every `BEGIN:VEVENT` ..
//! `END:VEVENT` block and the error type of the parse path. Timestamps are
//! naive wall-clock values; no timezone is ever attached or resolved.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Timestamp type used throughout the parser (naive local wall-clock time)
pub type Timestamp = NaiveDateTime;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, VeventError>;

/// Compact `YYYYMMDDTHHMMSS` layout used by calendar property values
pub const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Errors that can occur during extraction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VeventError {
    /// An event reached its closing boundary without a start timestamp
    #[error("Malformed event closed at line {line}: no start timestamp (summary: {summary:?})")]
    MalformedEvent {
        /// 1-based logical line number of the closing boundary token
        line: usize,
        /// Summary collected before the event was closed (may be empty)
        summary: String,
    },
}

/// Value of a single event property
///
/// Serialized untagged: both variants render as strings. Events are
/// output-only, so there is no `Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Unescaped text value
    Text(String),
    /// Naive timestamp parsed from `YYYYMMDDTHHMMSS[Z]`
    Timestamp(Timestamp),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Timestamp(t) => write!(f, "{}", t.format(STAMP_FORMAT)),
        }
    }
}

impl FieldValue {
    /// Get the timestamp if this is a timestamp value
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            FieldValue::Timestamp(t) => Some(*t),
            FieldValue::Text(_) => None,
        }
    }

    /// Get the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Timestamp(_) => None,
        }
    }
}

/// One calendar event (a single VEVENT block)
///
/// The five well-known properties are typed fields. Every other recognized
/// property lands in `fields`, keyed by its lowercase name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
    /// SUMMARY property
    pub summary: String,
    /// DESCRIPTION property
    pub description: String,
    /// LOCATION property
    pub location: String,
    /// DTSTART property, required once the event is closed
    pub start: Option<Timestamp>,
    /// DTEND property
    pub end: Option<Timestamp>,
    /// Any other property (e.g. "uid", "status", "stamp")
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Event {
    /// Create a blank event
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a field by its lowercase property name
    ///
    /// `start`/`end` only take timestamps; a text value under either name is
    /// kept in the side-table so the typed bounds never hold text. The text
    /// fields take the compact rendering of a timestamp-shaped value.
    pub fn set_field(&mut self, name: &str, value: FieldValue) {
        match (name, value) {
            ("start", FieldValue::Timestamp(t)) => self.start = Some(t),
            ("end", FieldValue::Timestamp(t)) => self.end = Some(t),
            ("summary", value) => self.summary = value.to_string(),
            ("description", value) => self.description = value.to_string(),
            ("location", value) => self.location = value.to_string(),
            (other, value) => {
                self.fields.insert(other.to_string(), value);
            }
        }
    }

    /// Look up any field by lowercase name, typed or dynamic
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "summary" => Some(FieldValue::Text(self.summary.clone())),
            "description" => Some(FieldValue::Text(self.description.clone())),
            "location" => Some(FieldValue::Text(self.location.clone())),
            "start" if self.start.is_some() => self.start.map(FieldValue::Timestamp),
            "end" if self.end.is_some() => self.end.map(FieldValue::Timestamp),
            other => self.fields.get(other).cloned(),
        }
    }

    /// Check whether `at` lies strictly inside `(start, end)`
    ///
    /// An event without an end never contains anything.
    pub fn is_ongoing_at(&self, at: Timestamp) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start < at && at < end,
            _ => false,
        }
    }

    /// Check whether both bounds lie strictly after `at`
    pub fn is_upcoming_at(&self, at: Timestamp) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start > at && end > at,
            _ => false,
        }
    }

    /// Render the event's time range as `HH:MM - HH:MM`
    pub fn time_string(&self) -> String {
        format!("{} - {}", clock(self.start), clock(self.end))
    }
}

fn clock(t: Option<Timestamp>) -> String {
    match t {
        Some(t) => format!("{:02}:{:02}", t.hour(), t.minute()),
        None => "?".to_string(),
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.time_string(), self.summary, self.location)
    }
}
