use anyhow::Result;
use chrono::{DateTime, Local, NaiveDateTime};
use chrono_english::{Dialect, parse_date_string};
use clap::{CommandFactory, ValueEnum};

use crate::storage::codec::parse_time;

use super::Args;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum DateStyle {
    #[default]
    Uk,
    Us,
}

impl From<DateStyle> for Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

/// Parses a time given on the command line. The formats of the log files come first, so
/// `14:32` always means today at 14:32. Anything else goes through natural language parsing,
/// like "yesterday" or "1 hour ago".
pub fn parse_time_arg(
    name: &str,
    value: &str,
    now: DateTime<Local>,
    date_style: DateStyle,
) -> Result<NaiveDateTime> {
    if let Ok(time) = parse_time(value, now.date_naive()) {
        return Ok(time);
    }
    match parse_date_string(value, now, date_style.into()) {
        Ok(time) => Ok(time.naive_local()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate {name} {value:?}: {e}"),
            )
            .into()),
    }
}

/// Same as [parse_time_arg] for optional arguments.
pub fn parse_optional_time_arg(
    name: &str,
    value: Option<&str>,
    now: DateTime<Local>,
    date_style: DateStyle,
) -> Result<Option<NaiveDateTime>> {
    value
        .map(|value| parse_time_arg(name, value, now, date_style))
        .transpose()
}
