//! Parser configuration types
//!
//! Every field defaults to the plain VEVENT behavior, so `ParserConfig::default()`
//! is what `parse`/`extract` use.

use serde::{Deserialize, Serialize};

/// Default opening boundary token
pub const BEGIN_VEVENT: &str = "BEGIN:VEVENT";

/// Default closing boundary token
pub const END_VEVENT: &str = "END:VEVENT";

/// Configuration for the event extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Line that opens an event (exact match)
    #[serde(default = "default_begin_token")]
    pub begin_token: String,

    /// Line that closes an event (exact match)
    #[serde(default = "default_end_token")]
    pub end_token: String,

    /// Whether to turn `\n` and `\,` in text values into newline and comma
    #[serde(default = "default_true")]
    pub unescape_text: bool,

    /// Drop events that close without a start instead of failing the parse
    #[serde(default)]
    pub skip_events_without_start: bool,
}

fn default_begin_token() -> String {
    BEGIN_VEVENT.to_string()
}

fn default_end_token() -> String {
    END_VEVENT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            begin_token: default_begin_token(),
            end_token: default_end_token(),
            unescape_text: true,
            skip_events_without_start: false,
        }
    }
}

impl ParserConfig {
    /// Create a new parser configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set both boundary tokens
    pub fn with_boundary_tokens(mut self, begin: impl Into<String>, end: impl Into<String>) -> Self {
        self.begin_token = begin.into();
        self.end_token = end.into();
        self
    }

    /// Builder method: enable or disable text unescaping
    pub fn with_unescape_text(mut self, enabled: bool) -> Self {
        self.unescape_text = enabled;
        self
    }

    /// Builder method: drop start-less events instead of erroring
    pub fn with_skip_events_without_start(mut self, enabled: bool) -> Self {
        self.skip_events_without_start = enabled;
        self
    }

    /// Check if a line opens an event
    pub fn is_begin(&self, line: &str) -> bool {
        line == self.begin_token
    }

    /// Check if a line closes an event
    pub fn is_end(&self, line: &str) -> bool {
        line == self.end_token
    }
}
