use std::{future::Future, ops::Deref, path::PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use tracing::{debug, info, instrument};

use crate::fs::operations::{
    append_line, overwrite_line, read_first_line, read_lines, remove_if_exists,
};

use super::{
    codec::{decode, encode},
    entities::{TaskDraft, TaskRecord},
    error::{TaskError, TaskResult},
    paths::StoreLocation,
};

/// How a finished task gets into the daily log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DailyLogMode {
    /// Replace the whole daily log with the finished task. Earlier entries of the day are lost.
    /// This is how logs have always been written, so it stays the default.
    #[default]
    Overwrite,
    /// Add the finished task as a new line.
    Append,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub log_mode: DailyLogMode,
}

impl StoreConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            log_mode: DailyLogMode::default(),
        }
    }

    pub fn with_log_mode(self, log_mode: DailyLogMode) -> Self {
        Self { log_mode, ..self }
    }
}

/// The two singleton files living in the root directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    /// The task in progress.
    Current,
    /// The task that was finished most recently. Cleared whenever a new task is set.
    Last,
}

impl Pointer {
    pub fn file_name(&self) -> &'static str {
        match self {
            Pointer::Current => "current",
            Pointer::Last => "last",
        }
    }
}

/// Raw content of a daily log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyLog {
    pub day: NaiveDate,
    pub path: PathBuf,
    pub lines: Vec<String>,
}

/// Interface the range query reads daily logs through.
pub trait TaskStorage {
    /// Reference time of the storage. Running tasks are measured against it.
    fn now(&self) -> NaiveDateTime;

    /// Reads the daily log of `day`. `None` if nothing was logged that day.
    fn read_daily_log(&self, day: NaiveDate) -> impl Future<Output = TaskResult<Option<DailyLog>>>;
}

impl<T: Deref> TaskStorage for T
where
    T::Target: TaskStorage,
{
    fn now(&self) -> NaiveDateTime {
        self.deref().now()
    }

    fn read_daily_log(
        &self,
        day: NaiveDate,
    ) -> impl Future<Output = TaskResult<Option<DailyLog>>> {
        self.deref().read_daily_log(day)
    }
}

/// The main realization of [TaskStorage]. A store is scoped to a single reference time, which
/// decides the daily log finished tasks are written to.
#[derive(Debug)]
pub struct TaskStore {
    config: StoreConfig,
    location: StoreLocation,
    now: NaiveDateTime,
}

impl TaskStore {
    /// Creates a store for `now`, making sure the directory of today's log exists.
    pub fn new(config: StoreConfig, now: NaiveDateTime) -> TaskResult<Self> {
        let location = StoreLocation::create(&config.root, now.date())?;
        Ok(Self::from_parts(config, location, now))
    }

    /// Creates a store writing into an explicit location. Nothing is created on disk.
    pub fn from_parts(config: StoreConfig, location: StoreLocation, now: NaiveDateTime) -> Self {
        Self {
            config,
            location,
            now,
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn pointer_path(&self, pointer: Pointer) -> PathBuf {
        self.config.root.join(pointer.file_name())
    }

    /// Reads the first line of a pointer file. A running task gets the store's reference time as
    /// its finish.
    #[instrument(skip(self))]
    pub async fn get_task(&self, pointer: Pointer) -> TaskResult<Option<TaskRecord>> {
        self.read_pointer(pointer, self.now).await
    }

    pub async fn current_task(&self) -> TaskResult<Option<TaskRecord>> {
        self.get_task(Pointer::Current).await
    }

    pub async fn last_task(&self) -> TaskResult<Option<TaskRecord>> {
        self.get_task(Pointer::Last).await
    }

    /// Saves a task. Without a finish time it becomes the current task, otherwise it goes
    /// straight into the daily log. The `last` marker is dropped either way, unless the record
    /// is rejected.
    #[instrument(skip(self))]
    pub async fn set_task(&self, draft: TaskDraft) -> TaskResult<TaskRecord> {
        let record = draft.into_record(self.now);
        let line = encode(&record)?;

        self.remove_pointer(Pointer::Last).await?;

        if record.is_running() {
            let path = self.pointer_path(Pointer::Current);
            overwrite_line(&path, &line)
                .await
                .map_err(|e| TaskError::filesystem(&path, e))?;
            info!("Started {:?}", record.description);
        } else {
            let path = &self.location.daily_log;
            let written = match self.config.log_mode {
                DailyLogMode::Overwrite => overwrite_line(path, &line).await,
                DailyLogMode::Append => append_line(path, &line).await,
            };
            written.map_err(|e| TaskError::filesystem(path, e))?;
            info!("Logged {:?} into {path:?}", record.description);
        }

        Ok(record)
    }

    /// Finishes the running task at `at` (or the reference time), writes it into the daily log
    /// and leaves it behind as the `last` task. `None` if no task is running.
    #[instrument(skip(self))]
    pub async fn finish_current(
        &self,
        at: Option<NaiveDateTime>,
    ) -> TaskResult<Option<TaskRecord>> {
        let finish = at.unwrap_or(self.now);
        let Some(record) = self.read_pointer(Pointer::Current, finish).await? else {
            debug!("Nothing to finish");
            return Ok(None);
        };

        let record = self.set_task(record.into()).await?;
        self.remove_pointer(Pointer::Current).await?;
        self.write_last(&record).await?;

        Ok(Some(record))
    }

    /// Starts a task, finishing the running one at the new task's start first. The finished
    /// task stays behind as `last`. A draft with a finish time is only logged and leaves the
    /// running task alone.
    #[instrument(skip(self))]
    pub async fn switch_task(
        &self,
        draft: TaskDraft,
    ) -> TaskResult<(Option<TaskRecord>, TaskRecord)> {
        let record = draft.into_record(self.now);
        if !record.is_running() {
            return Ok((None, self.set_task(record.into()).await?));
        }
        record.validate()?;

        let previous = self.finish_current(Some(record.start)).await?;
        let record = self.set_task(record.into()).await?;
        if let Some(previous) = &previous {
            self.write_last(previous).await?;
        }

        Ok((previous, record))
    }

    /// Drops the running task without logging it.
    #[instrument(skip(self))]
    pub async fn cancel_current(&self) -> TaskResult<Option<TaskRecord>> {
        let record = self.current_task().await?;
        self.remove_pointer(Pointer::Current).await?;
        Ok(record)
    }

    async fn read_pointer(
        &self,
        pointer: Pointer,
        now_fallback: NaiveDateTime,
    ) -> TaskResult<Option<TaskRecord>> {
        let path = self.pointer_path(pointer);
        let line = read_first_line(&path)
            .await
            .map_err(|e| TaskError::filesystem(&path, e))?;
        line.map(|line| decode(&line, self.now.date(), now_fallback))
            .transpose()
    }

    async fn write_last(&self, record: &TaskRecord) -> TaskResult<()> {
        let path = self.pointer_path(Pointer::Last);
        overwrite_line(&path, &encode(record)?)
            .await
            .map_err(|e| TaskError::filesystem(&path, e))
    }

    async fn remove_pointer(&self, pointer: Pointer) -> TaskResult<bool> {
        let path = self.pointer_path(pointer);
        remove_if_exists(&path)
            .await
            .map_err(|e| TaskError::filesystem(&path, e))
    }
}

impl TaskStorage for TaskStore {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    async fn read_daily_log(&self, day: NaiveDate) -> TaskResult<Option<DailyLog>> {
        let path = StoreLocation::resolve(&self.config.root, day).daily_log;
        let lines = read_lines(&path)
            .await
            .map_err(|e| TaskError::filesystem(&path, e))?;
        Ok(lines.map(|lines| DailyLog { day, path, lines }))
    }
}
