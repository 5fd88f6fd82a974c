//! Report generation
//!
//! Renders query results for one calendar file as plain text or JSON.

use crate::config::{OutputConfig, OutputFormat};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt::{self, Write};
use std::path::Path;
use vevent_parser::{CalendarIndex, Event, IndexStats};

/// A resolved query against one index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Day(NaiveDate),
    Current(NaiveDateTime),
    Next(NaiveDateTime),
    Dump,
    Stats,
}

impl Query {
    fn title(&self) -> String {
        match self {
            Query::Day(date) => format!("Events on {}", date),
            Query::Current(at) => format!("Current event at {}", at),
            Query::Next(at) => format!("Next event after {}", at),
            Query::Dump => "All events".to_string(),
            Query::Stats => "Statistics".to_string(),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a Path,
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<&'a Event>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<IndexStats>,
}

/// Events selected by a query, in the order they should be shown
pub fn select<'a>(index: &'a CalendarIndex, query: Query) -> Vec<&'a Event> {
    match query {
        Query::Day(date) => index.events_on_day(date).iter().collect(),
        Query::Current(at) => index.current_event(at).into_iter().collect(),
        Query::Next(at) => index.next_event(at).into_iter().collect(),
        Query::Dump => index.iter().flat_map(|(_, events)| events).collect(),
        Query::Stats => Vec::new(),
    }
}

/// Render the result of `query` for one file
pub fn render(path: &Path, index: &CalendarIndex, query: Query, output: &OutputConfig) -> Result<String> {
    match output.format {
        OutputFormat::Json => {
            let report = JsonReport {
                file: path,
                query: query.title(),
                events: (query != Query::Stats).then(|| select(index, query)),
                stats: (query == Query::Stats).then(|| index.stats()),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Txt => Ok(render_txt(path, index, query, &output.time_format)?),
    }
}

fn render_txt(path: &Path, index: &CalendarIndex, query: Query, time_format: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "═══ {} ═══", path.display())?;
    writeln!(out, "{}\n", query.title())?;

    match query {
        Query::Stats => {
            let stats = index.stats();
            writeln!(out, "  Events: {}", stats.num_events)?;
            writeln!(out, "  Days:   {}", stats.num_days)?;
            if let (Some(first), Some(last)) = (stats.first_day, stats.last_day) {
                writeln!(out, "  Range:  {} .. {}", first, last)?;
            }
        }
        Query::Dump => {
            for (date, events) in index.iter() {
                writeln!(out, "{}", date.format("%Y-%m-%d %A"))?;
                for event in events {
                    write_event(&mut out, event, time_format)?;
                }
            }
        }
        _ => {
            let events = select(index, query);
            if events.is_empty() {
                writeln!(out, "  (none)")?;
            }
            for event in events {
                write_event(&mut out, event, time_format)?;
            }
        }
    }

    Ok(out)
}

fn write_event(out: &mut String, event: &Event, time_format: &str) -> fmt::Result {
    write!(out, "  ")?;
    write_time(out, event.start, time_format)?;
    write!(out, " - ")?;
    write_time(out, event.end, time_format)?;
    writeln!(out, "  {}", event.summary)?;

    if !event.location.is_empty() {
        writeln!(out, "      @ {}", event.location)?;
    }
    for line in event.description.lines().filter(|l| !l.is_empty()) {
        writeln!(out, "      | {}", line)?;
    }
    Ok(())
}

// Formatting goes through `write!` so a bad format string surfaces as fmt::Error
fn write_time(out: &mut String, t: Option<NaiveDateTime>, time_format: &str) -> fmt::Result {
    match t {
        Some(t) => write!(out, "{}", t.format(time_format)),
        None => write!(out, "?"),
    }
}
