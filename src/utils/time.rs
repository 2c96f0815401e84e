use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound};

/// This is the standard way of converting a date to a string in ttracker.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Name of the month directory, for example `05_May`.
pub fn date_to_month_dir(date: NaiveDate) -> String {
    date.format("%m_%b").to_string()
}

pub fn date_to_year_dir(date: NaiveDate) -> String {
    format!("{:04}", date.year())
}

/// Local wall-clock time truncated to whole seconds, the precision of the log files.
pub fn to_wall_time(time: DateTime<Local>) -> NaiveDateTime {
    time.naive_local().trunc_subsecs(0)
}

pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable second of the day.
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    day_start(date) + Duration::days(1) - Duration::seconds(1)
}

/// Converts a duration into whole minutes, rounding any leftover up. 30 seconds are 1 minute,
/// 14 minutes exactly stay 14.
pub fn minutes_ceil(duration: Duration) -> i64 {
    let millis = duration.num_milliseconds();
    (millis + 59_999).div_euclid(60_000)
}

/// Formats minutes as `H:MM`, e.g. 95 -> `1:35`, 5 -> `0:05`.
pub fn format_minutes(minutes: i64) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Formats a time of day as `HH:MM:SS`.
pub fn format_time(time: NaiveDateTime) -> String {
    time.format("%H:%M:%S").to_string()
}
