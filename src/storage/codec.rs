//! Conversion between [TaskRecord] and the lines stored in pointer files and daily logs.
//!
//! A line is `start, description` for a running task and `start, finish, description` for a
//! finished one. Times are written as full date-times, but hand-written lines may use a bare
//! time of day, which is then placed on the day the line belongs to.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

use super::{
    entities::{FIELD_SEPARATOR, TaskRecord},
    error::{TaskError, TaskResult},
};

/// Format every time is written with.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FIELD_JOIN: &str = ", ";

const DATE_TIME_FORMATS: [&str; 3] = [TIME_FORMAT, "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

const TIME_OF_DAY_FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%I:%M%p", "%I:%M %p"];

pub fn encode(record: &TaskRecord) -> TaskResult<String> {
    record.validate()?;
    let start = record.start.format(TIME_FORMAT);
    let description = record.description.trim();
    let line = match record.finish {
        Some(finish) => format!(
            "{start}{FIELD_JOIN}{}{FIELD_JOIN}{description}",
            finish.format(TIME_FORMAT)
        ),
        None => format!("{start}{FIELD_JOIN}{description}"),
    };
    Ok(line)
}

/// Parses a stored line. Bare times of day are placed on `reference_day`, and a line without a
/// finish time gets `now_fallback` instead, so running tasks can be measured.
pub fn decode(
    line: &str,
    reference_day: NaiveDate,
    now_fallback: NaiveDateTime,
) -> TaskResult<TaskRecord> {
    let mut fields = line.split(FIELD_SEPARATOR).map(str::trim);

    let start = match fields.next() {
        Some(field) if !field.is_empty() => parse_time(field, reference_day)?,
        _ => return Err(TaskError::parse(line, "missing start time")),
    };

    let rest = fields.collect::<Vec<_>>();
    let (finish, description) = match rest.as_slice() {
        [finish, description] => (parse_time(finish, reference_day)?, description.to_string()),
        // Lines written by hand may carry the separator inside the description.
        rest => (now_fallback, rest.join(FIELD_JOIN)),
    };

    let record = TaskRecord::new(start, Some(finish), &description);
    record.validate_order()?;
    Ok(record)
}

/// Parses a time field. Accepts a full date-time, or a time of day combined with `reference_day`.
pub fn parse_time(field: &str, reference_day: NaiveDate) -> TaskResult<NaiveDateTime> {
    let field = field.trim();

    if let Some(time) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(field, format).ok())
    {
        return Ok(time);
    }

    if let Ok(time) = DateTime::parse_from_rfc3339(field) {
        return Ok(time.with_timezone(&Local).naive_local());
    }

    TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(field, format).ok())
        .map(|time| reference_day.and_time(time))
        .ok_or_else(|| TaskError::parse(field, "not a time"))
}
