//! Date-bucketed event index
//!
//! Events are stored per start date, in the order they were read. The index is
//! built once by the extractor and only read afterwards.

use crate::types::{Event, Timestamp};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Year → month → day → events, keyed by each event's start date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarIndex {
    days: BTreeMap<NaiveDate, Vec<Event>>,
}

/// Summary counts for an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub num_events: usize,
    pub num_days: usize,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
}

impl CalendarIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the bucket of its start date
    ///
    /// Events without a start are rejected by the extractor before they get here;
    /// this returns `false` and leaves the index unchanged if one slips through.
    pub(crate) fn insert(&mut self, event: Event) -> bool {
        match event.start {
            Some(start) => {
                self.days.entry(start.date()).or_default().push(event);
                true
            }
            None => false,
        }
    }

    /// Events starting on the given day, in source order
    ///
    /// Missing days yield an empty slice.
    pub fn events_on_day<D: Datelike>(&self, date: D) -> &[Event] {
        self.get(date.year(), date.month(), date.day())
    }

    /// Bucket for a (year, month, day) triple
    pub fn get(&self, year: i32, month: u32, day: u32) -> &[Event] {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| self.days.get(&date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First event of `now`'s day, scanning forward, with `start < now < end`
    pub fn current_event(&self, now: Timestamp) -> Option<&Event> {
        self.events_on_day(now)
            .iter()
            .find(|event| event.is_ongoing_at(now))
    }

    /// Last event of `now`'s day, scanning backward, starting and ending after `now`
    ///
    /// The backward scan means that with several upcoming events the one
    /// stored last wins, not the soonest.
    pub fn next_event(&self, now: Timestamp) -> Option<&Event> {
        self.events_on_day(now)
            .iter()
            .rev()
            .find(|event| event.is_upcoming_at(now))
    }

    /// `current_event` evaluated at the local wall-clock time
    pub fn current_event_now(&self) -> Option<&Event> {
        self.current_event(Local::now().naive_local())
    }

    /// `next_event` evaluated at the local wall-clock time
    pub fn next_event_now(&self) -> Option<&Event> {
        self.next_event(Local::now().naive_local())
    }

    /// Years that hold at least one event, ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.days.keys().map(|d| d.year()).collect();
        years.dedup();
        years
    }

    /// Months of `year` that hold at least one event, ascending
    pub fn months(&self, year: i32) -> Vec<u32> {
        let mut months: Vec<u32> = self
            .days
            .keys()
            .filter(|d| d.year() == year)
            .map(|d| d.month())
            .collect();
        months.dedup();
        months
    }

    /// Days of `year`-`month` that hold at least one event, ascending
    pub fn days(&self, year: i32, month: u32) -> Vec<u32> {
        self.days
            .keys()
            .filter(|d| d.year() == year && d.month() == month)
            .map(|d| d.day())
            .collect()
    }

    /// All buckets in chronological order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[Event])> {
        self.days.iter().map(|(date, events)| (*date, events.as_slice()))
    }

    /// Total number of events
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// Check if the index holds no events
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of days with at least one event
    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    /// Get summary counts
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_events: self.len(),
            num_days: self.num_days(),
            first_day: self.days.keys().next().copied(),
            last_day: self.days.keys().next_back().copied(),
        }
    }
}
