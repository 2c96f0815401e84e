use chrono::NaiveDateTime;
use serde::Serialize;

use crate::utils::time::minutes_ceil;

use super::error::{TaskError, TaskResult};

/// Separator used between fields of a stored line. Descriptions can't contain it, otherwise the
/// line would be ambiguous on the way back.
pub const FIELD_SEPARATOR: char = ',';

/// One tracked activity. Times are local wall-clock times, which is how they are written into the
/// log files.
#[derive(PartialEq, Eq, Debug, Serialize, Clone)]
pub struct TaskRecord {
    pub start: NaiveDateTime,
    /// `None` while the task is still running.
    pub finish: Option<NaiveDateTime>,
    pub description: String,
}

impl TaskRecord {
    pub fn new(start: NaiveDateTime, finish: Option<NaiveDateTime>, description: &str) -> Self {
        Self {
            start,
            finish,
            description: description.trim().to_owned(),
        }
    }

    pub fn running(start: NaiveDateTime, description: &str) -> Self {
        Self::new(start, None, description)
    }

    pub fn is_running(&self) -> bool {
        self.finish.is_none()
    }

    /// Whole minutes between start and finish, rounded up. `None` for running tasks, use
    /// [TaskRecord::duration_minutes_at] to measure those against a reference time.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.finish.map(|finish| minutes_ceil(finish - self.start))
    }

    pub fn duration_minutes_at(&self, now: NaiveDateTime) -> i64 {
        minutes_ceil(self.finish.unwrap_or(now) - self.start)
    }

    /// A task can't finish before it started.
    pub fn validate_order(&self) -> TaskResult<()> {
        match self.finish {
            Some(finish) if finish < self.start => Err(TaskError::InvalidRecord(format!(
                "finish {finish} is before start {}",
                self.start
            ))),
            _ => Ok(()),
        }
    }

    /// Checks invariants a record must hold before it is written. A record takes exactly one
    /// line, so the description can't hold the separator or a line break.
    pub fn validate(&self) -> TaskResult<()> {
        self.validate_order()?;
        if let Some(forbidden) = self
            .description
            .chars()
            .find(|c| matches!(*c, FIELD_SEPARATOR | '\n' | '\r'))
        {
            return Err(TaskError::InvalidRecord(format!(
                "description {:?} can't contain {forbidden:?}",
                self.description
            )));
        }
        Ok(())
    }
}

/// Input for [TaskStore::set_task](super::task_store::TaskStore::set_task). Unlike
/// [TaskRecord] the start is optional and falls back to the store's reference time.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub start: Option<NaiveDateTime>,
    pub finish: Option<NaiveDateTime>,
    pub description: String,
}

impl TaskDraft {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn starting_at(self, start: Option<NaiveDateTime>) -> Self {
        Self { start, ..self }
    }

    pub fn finishing_at(self, finish: Option<NaiveDateTime>) -> Self {
        Self { finish, ..self }
    }

    pub fn into_record(self, now: NaiveDateTime) -> TaskRecord {
        TaskRecord::new(self.start.unwrap_or(now), self.finish, &self.description)
    }
}

impl From<TaskRecord> for TaskDraft {
    fn from(
        TaskRecord {
            start,
            finish,
            description,
        }: TaskRecord,
    ) -> Self {
        TaskDraft {
            start: Some(start),
            finish,
            description,
        }
    }
}
