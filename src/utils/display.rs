//! Display and output formatting utilities

use crate::config::StatsFormat;
use crate::sat::EncodingStatistics;
use anyhow::{Context, Result};
use std::ffi::OsString;

/// Render encoding statistics for the terminal or for tools
pub struct StatisticsFormatter;

impl StatisticsFormatter {
    pub fn format(statistics: &EncodingStatistics, format: StatsFormat) -> Result<String> {
        match format {
            StatsFormat::Text => Ok(statistics.to_string()),
            StatsFormat::Json => serde_json::to_string_pretty(statistics)
                .context("Failed to serialize statistics"),
        }
    }
}

/// ANSI styling for status messages on the terminal
pub struct ColorOutput;

impl ColorOutput {
    pub fn success(text: &str) -> String {
        Self::paint(text, Tone::Success)
    }

    pub fn warning(text: &str) -> String {
        Self::paint(text, Tone::Warning)
    }

    pub fn info(text: &str) -> String {
        Self::paint(text, Tone::Info)
    }

    /// Wrap `text` in the escape sequence for `tone`, unless styling is off
    pub fn paint(text: &str, tone: Tone) -> String {
        if styling_enabled(std::env::var_os("NO_COLOR"), std::env::var_os("TERM")) {
            format!("\x1b[{}m{}\x1b[0m", tone.sgr(), text)
        } else {
            text.to_owned()
        }
    }
}

/// `NO_COLOR` set to anything non-empty, or a dumb terminal, disables styling
fn styling_enabled(no_color: Option<OsString>, term: Option<OsString>) -> bool {
    let opted_out = no_color.is_some_and(|value| !value.is_empty());
    let dumb = term.is_some_and(|value| value == "dumb");
    !opted_out && !dumb
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Info,
}

impl Tone {
    /// SGR parameters: bold green, yellow, cyan
    fn sgr(self) -> &'static str {
        match self {
            Tone::Success => "1;32",
            Tone::Warning => "33",
            Tone::Info => "36",
        }
    }
}
