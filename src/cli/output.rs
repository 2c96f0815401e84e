use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::{
    query::TaskRange,
    storage::entities::TaskRecord,
    utils::time::{format_minutes, format_time},
};

/// What gets printed for a task in `--json` mode.
#[derive(Debug, Serialize)]
struct TaskView<'a> {
    start: NaiveDateTime,
    finish: Option<NaiveDateTime>,
    description: &'a str,
    duration_minutes: i64,
    running: bool,
}

impl<'a> TaskView<'a> {
    fn new(record: &'a TaskRecord, now: NaiveDateTime, running: bool) -> Self {
        Self {
            start: record.start,
            finish: if running { None } else { record.finish },
            description: &record.description,
            duration_minutes: record.duration_minutes_at(now),
            running,
        }
    }
}

#[derive(Debug, Serialize)]
struct RangeView<'a> {
    from: NaiveDateTime,
    to: NaiveDateTime,
    tasks: Vec<TaskView<'a>>,
    total_minutes: i64,
}

/// `HH:MM:SS - HH:MM:SS  H:MM  description`. Running tasks show no finish.
pub fn format_task(record: &TaskRecord, now: NaiveDateTime, running: bool) -> String {
    let finish = match record.finish {
        Some(finish) if !running => format_time(finish),
        _ => "...".to_owned(),
    };
    format!(
        "{} - {:>8}\t{}\t{}",
        format_time(record.start),
        finish,
        format_minutes(record.duration_minutes_at(now)),
        record.description
    )
}

pub fn print_task(
    record: &TaskRecord,
    now: NaiveDateTime,
    running: bool,
    json: bool,
) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&TaskView::new(record, now, running))?
        );
    } else {
        println!("{}", format_task(record, now, running));
    }
    Ok(())
}

/// Prints tasks grouped under the day they started on, followed by the total.
pub fn print_range(range: &TaskRange, json: bool) -> Result<()> {
    for rejected in &range.rejected {
        eprintln!(
            "Skipped line {} of {}: {}",
            rejected.line_number,
            rejected.path.display(),
            rejected.error
        );
    }

    if json {
        let view = RangeView {
            from: range.from,
            to: range.to,
            tasks: range
                .tasks
                .iter()
                .map(|v| TaskView::new(v, range.now, false))
                .collect(),
            total_minutes: range.total_minutes(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if range.tasks.is_empty() {
        println!("No tasks logged between {} and {}", range.from, range.to);
        return Ok(());
    }

    let mut last_day: Option<NaiveDate> = None;
    for task in &range.tasks {
        let day = task.start.date();
        if last_day != Some(day) {
            if last_day.is_some() {
                println!();
            }
            println!("{}", day.format("%A %Y-%m-%d"));
            last_day = Some(day);
        }
        println!("  {}", format_task(task, range.now, false));
    }
    println!();
    println!("Total\t{}", format_minutes(range.total_minutes()));
    Ok(())
}
