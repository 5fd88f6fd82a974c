//! VEVENT CLI Application
//!
//! Command-line front end for the vevent-parser library. It adds what the
//! library leaves to its callers:
//! - Loading .ics files (UTF-8, with a Latin-1 fallback)
//! - Parsing several files in parallel, one independent index each
//! - Resolving "today"/"now" from the local clock
//! - Report generation (TXT/JSON)

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use vevent_parser::{CalendarIndex, EventExtractor, ParserConfig};

mod config;
mod report;

use config::{AppConfig, OutputFormat};
use report::Query;

/// VEVENT - Query events in iCalendar files
#[derive(Parser, Debug)]
#[command(name = "vevent")]
#[command(about = "Index the events of .ics files by day and query them", long_about = None)]
#[command(version)]
struct Args {
    /// Path to .ics file(s) (can be repeated)
    #[arg(short, long, value_name = "FILE")]
    ics: Vec<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Skip events without a start instead of failing
    #[arg(long)]
    skip_missing_start: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// List the events starting on a day
    Day {
        /// Day to list, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Show the event in progress
    Now {
        /// Reference time, YYYY-MM-DDTHH:MM:SS (default: now)
        #[arg(short, long)]
        at: Option<NaiveDateTime>,
    },
    /// Show the upcoming event of the day
    Next {
        /// Reference time, YYYY-MM-DDTHH:MM:SS (default: now)
        #[arg(short, long)]
        at: Option<NaiveDateTime>,
    },
    /// Print the whole index, day by day
    Dump,
    /// Print event and day counts
    Stats,
}

impl Command {
    fn resolve(self) -> Query {
        let now = Local::now().naive_local();
        match self {
            Command::Day { date } => Query::Day(date.unwrap_or(now.date())),
            Command::Now { at } => Query::Current(at.unwrap_or(now)),
            Command::Next { at } => Query::Next(at.unwrap_or(now)),
            Command::Dump => Query::Dump,
            Command::Stats => Query::Stats,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("VEVENT CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using parser library v{}", vevent_parser::VERSION);

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &args);

    if config.input.files.is_empty() {
        bail!("No input specified. Pass --ics <FILE> or list files under [input] in the config");
    }

    let query = args.command.resolve();
    log::debug!("Resolved query: {:?}", query);

    // Each file gets its own extractor run; nothing is shared between them
    let indexes: Vec<Result<CalendarIndex>> = config
        .input
        .files
        .par_iter()
        .map(|path| load_calendar(path, &config.parser))
        .collect();

    for (path, index) in config.input.files.iter().zip(indexes) {
        let index = index?;
        println!("{}", report::render(path, &index, query, &config.output)?);
    }

    Ok(())
}

/// Command-line flags win over the config file
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    config.input.files.extend(args.ics.iter().cloned());
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.skip_missing_start {
        config.parser.skip_events_without_start = true;
    }
}

/// Read one calendar file and build its index
fn load_calendar(path: &Path, parser: &ParserConfig) -> Result<CalendarIndex> {
    log::info!("Parsing calendar file: {:?}", path);

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file {:?}", path))?;

    // Try UTF-8 first, then fall back to Latin-1
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("{:?} is not UTF-8, decoding as Latin-1", path);
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    };

    let index = EventExtractor::with_config(parser.clone())
        .parse(&text)
        .with_context(|| format!("Failed to parse calendar {:?}", path))?;

    log::info!("Indexed {} events from {:?}", index.len(), path);
    Ok(index)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(cli: &[&str]) -> Args {
        Args::try_parse_from(cli).unwrap()
    }

    #[test]
    fn test_args_parsing() {
        let args = args(&["vevent", "--ics", "a.ics", "-i", "b.ics", "-vv", "day", "--date", "2017-01-18"]);
        assert_eq!(args.ics.len(), 2);
        assert_eq!(args.verbose, 2);
        assert_eq!(
            args.command.resolve(),
            Query::Day(NaiveDate::from_ymd_opt(2017, 1, 18).unwrap())
        );
    }

    #[test]
    fn test_next_with_reference_time() {
        let args = args(&["vevent", "-i", "a.ics", "next", "--at", "2017-01-18T08:30:00"]);
        let at = NaiveDate::from_ymd_opt(2017, 1, 18)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(args.command.resolve(), Query::Next(at));
    }

    #[test]
    fn test_overrides() {
        let args = args(&["vevent", "-i", "extra.ics", "-f", "json", "--skip-missing-start", "stats"]);
        let mut config: AppConfig = toml::from_str("[input]\nfiles = [\"base.ics\"]").unwrap();
        apply_overrides(&mut config, &args);

        assert_eq!(config.input.files, vec![PathBuf::from("base.ics"), PathBuf::from("extra.ics")]);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.parser.skip_events_without_start);
    }

    #[test]
    fn test_load_calendar_latin1() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"BEGIN:VEVENT\nDTSTART:20170118T090000\nSUMMARY:Caf\xe9\nEND:VEVENT\n")
            .unwrap();
        file.flush().unwrap();

        let index = load_calendar(file.path(), &ParserConfig::default()).unwrap();
        assert_eq!(index.get(2017, 1, 18)[0].summary, "Café");
    }

    #[test]
    fn test_load_calendar_reports_malformed_event() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"BEGIN:VEVENT\nSUMMARY:x\nEND:VEVENT\n").unwrap();
        file.flush().unwrap();

        let err = load_calendar(file.path(), &ParserConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse calendar"));
    }
}
