//! Collects logged tasks across several days.
//!
//! Days are only used as buckets: every task stored in the log of a day inside the range is
//! returned, even if its own start lies outside of the requested bounds.

use std::{future, path::PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use futures::{Stream, StreamExt, TryStreamExt, stream};
use tracing::{instrument, warn};

use crate::{
    storage::{
        codec::decode,
        entities::TaskRecord,
        error::{TaskError, TaskResult},
        task_store::{DailyLog, TaskStorage},
    },
    utils::time::{day_end, day_start},
};

/// Bounds of a query. Missing bounds fall back to the start and end of the storage's current day.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeConfig {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl RangeConfig {
    pub fn new(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        Self { from, to }
    }

    /// Fills in defaults and makes sure `from <= to`.
    pub fn normalize(&self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let from = self.from.unwrap_or_else(|| day_start(now.date()));
        let to = self.to.unwrap_or_else(|| day_end(now.date()));
        if from <= to { (from, to) } else { (to, from) }
    }
}

/// A line that couldn't be turned into a [TaskRecord]. The rest of the query is unaffected.
#[derive(Debug)]
pub struct RejectedLine {
    pub path: PathBuf,
    /// 1-based, the way editors count.
    pub line_number: usize,
    pub error: TaskError,
}

#[derive(Debug)]
pub struct TaskRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub now: NaiveDateTime,
    pub tasks: Vec<TaskRecord>,
    pub rejected: Vec<RejectedLine>,
}

impl TaskRange {
    fn new(from: NaiveDateTime, to: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self {
            from,
            to,
            now,
            tasks: vec![],
            rejected: vec![],
        }
    }

    fn push_log(&mut self, DailyLog { day, path, lines }: DailyLog) {
        for (index, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match decode(line, day, self.now) {
                Ok(record) => self.tasks.push(record),
                Err(error) => {
                    warn!(
                        "Skipping line {} in {path:?} {line:?}: {error}",
                        index + 1
                    );
                    self.rejected.push(RejectedLine {
                        path: path.clone(),
                        line_number: index + 1,
                        error,
                    });
                }
            }
        }
    }

    pub fn total_minutes(&self) -> i64 {
        self.tasks
            .iter()
            .map(|task| task.duration_minutes_at(self.now))
            .sum()
    }
}

/// Reads every daily log between `from` and `to` (both inclusive, at day granularity) in
/// ascending order. Days without a log are skipped. Lines that fail to parse are reported in
/// [TaskRange::rejected], while filesystem errors abort the query.
#[instrument(skip(storage))]
pub async fn tasks_between(
    storage: impl TaskStorage,
    config: RangeConfig,
) -> TaskResult<TaskRange> {
    let now = storage.now();
    let (from, to) = config.normalize(now);
    let storage = &storage;

    date_range(from.date(), to.date())
        .then(move |day| storage.read_daily_log(day))
        .try_fold(TaskRange::new(from, to, now), |mut range, log| {
            if let Some(log) = log {
                range.push_log(log);
            }
            future::ready(Ok(range))
        })
        .await
}

/// Returns a stream of dates between start (inclusive) and end (inclusive).
fn date_range(start: NaiveDate, end: NaiveDate) -> impl Stream<Item = NaiveDate> {
    stream::unfold(Some(start), move |current| {
        future::ready(
            current
                .filter(|day| *day <= end)
                .map(|day| (day, day.succ_opt())),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, path::PathBuf};

    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime};
    use futures::StreamExt;
    use tempfile::tempdir;

    use crate::{
        storage::{
            entities::{TaskDraft, TaskRecord},
            error::{TaskError, TaskResult},
            task_store::{DailyLog, DailyLogMode, StoreConfig, TaskStorage, TaskStore},
        },
        utils::logging::TEST_LOGGING,
    };

    use super::{RangeConfig, date_range, tasks_between};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2012, 5, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(d).and_hms_opt(h, m, 0).unwrap()
    }

    /// In-memory storage, so that the query can be tested without touching the disk.
    struct MemoryStorage {
        now: NaiveDateTime,
        logs: HashMap<NaiveDate, Vec<&'static str>>,
        broken_day: Option<NaiveDate>,
    }

    impl TaskStorage for MemoryStorage {
        fn now(&self) -> NaiveDateTime {
            self.now
        }

        async fn read_daily_log(&self, day: NaiveDate) -> TaskResult<Option<DailyLog>> {
            if self.broken_day == Some(day) {
                return Err(TaskError::filesystem(
                    "broken",
                    std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                ));
            }
            Ok(self.logs.get(&day).map(|lines| DailyLog {
                day,
                path: PathBuf::from(day.to_string()),
                lines: lines.iter().map(|v| v.to_string()).collect(),
            }))
        }
    }

    fn memory_storage() -> MemoryStorage {
        MemoryStorage {
            now: at(17, 15, 8),
            logs: HashMap::from([
                (
                    date(15),
                    vec!["12:56, 13:10, did the dishes", "14:00, 14:30, gym"],
                ),
                (date(17), vec!["9:00, 9:45, standup", "", "14:32, homework"]),
            ]),
            broken_day: None,
        }
    }

    #[tokio::test]
    async fn test_date_range() {
        let days = date_range(date(30), NaiveDate::from_ymd_opt(2012, 6, 2).unwrap())
            .collect::<Vec<_>>()
            .await;
        assert_eq!(days.len(), 4);
        assert_eq!(days[0], date(30));
        assert_eq!(days[3], NaiveDate::from_ymd_opt(2012, 6, 2).unwrap());

        let days = date_range(date(2), date(1)).collect::<Vec<_>>().await;
        assert!(days.is_empty());
    }

    #[test]
    fn test_normalize() {
        let now = at(16, 12, 0);
        assert_eq!(
            RangeConfig::default().normalize(now),
            (at(16, 0, 0), date(16).and_hms_opt(23, 59, 59).unwrap())
        );
        assert_eq!(
            RangeConfig::new(Some(at(17, 0, 0)), Some(at(15, 0, 0))).normalize(now),
            (at(15, 0, 0), at(17, 0, 0))
        );
    }

    #[tokio::test]
    async fn test_tasks_between_collects_in_order() -> Result<()> {
        *TEST_LOGGING;
        let storage = memory_storage();
        let range = tasks_between(
            &storage,
            RangeConfig::new(Some(at(15, 0, 0)), Some(at(17, 23, 0))),
        )
        .await?;

        let descriptions = range
            .tasks
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            descriptions,
            vec!["did the dishes", "gym", "standup", "homework"]
        );
        assert!(range.rejected.is_empty());

        // The running line is measured against the storage's reference time.
        assert_eq!(range.tasks[3].finish, Some(at(17, 15, 8)));
        assert_eq!(range.total_minutes(), 14 + 30 + 45 + 36);
        Ok(())
    }

    #[tokio::test]
    async fn test_tasks_between_reversed_bounds() -> Result<()> {
        let storage = memory_storage();
        let range = tasks_between(
            &storage,
            RangeConfig::new(Some(at(17, 0, 0)), Some(at(15, 0, 0))),
        )
        .await?;
        assert_eq!(range.tasks.len(), 4);
        assert_eq!(range.from, at(15, 0, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_tasks_between_does_not_filter_within_day() -> Result<()> {
        let storage = memory_storage();
        let range = tasks_between(
            &storage,
            RangeConfig::new(Some(at(15, 14, 0)), Some(at(15, 14, 1))),
        )
        .await?;
        assert_eq!(range.tasks.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_tasks_between_defaults_to_today() -> Result<()> {
        let storage = memory_storage();
        let range = tasks_between(&storage, RangeConfig::default()).await?;
        assert_eq!(range.tasks.len(), 2);
        assert_eq!(range.tasks[0].description, "standup");
        Ok(())
    }

    #[tokio::test]
    async fn test_tasks_between_reports_bad_lines() -> Result<()> {
        let mut storage = memory_storage();
        storage
            .logs
            .insert(date(16), vec!["sometime, 10:00, nap", "10:00, 11:00, walk"]);
        let range = tasks_between(
            &storage,
            RangeConfig::new(Some(at(16, 0, 0)), Some(at(16, 23, 0))),
        )
        .await?;
        assert_eq!(range.tasks.len(), 1);
        assert_eq!(range.tasks[0].description, "walk");
        assert_eq!(range.rejected.len(), 1);
        assert_eq!(range.rejected[0].line_number, 1);
        assert!(range.rejected[0].error.is_parse());
        Ok(())
    }

    #[tokio::test]
    async fn test_tasks_between_aborts_on_filesystem_error() {
        let mut storage = memory_storage();
        storage.broken_day = Some(date(16));
        let result = tasks_between(
            &storage,
            RangeConfig::new(Some(at(15, 0, 0)), Some(at(17, 0, 0))),
        )
        .await;
        assert!(matches!(result, Err(TaskError::Filesystem { .. })));
    }

    #[tokio::test]
    async fn test_tasks_between_empty_directories() -> Result<()> {
        let dir = tempdir()?;
        let store = TaskStore::new(StoreConfig::new(dir.path().to_owned()), at(17, 15, 8))?;
        let range = tasks_between(
            &store,
            RangeConfig::new(Some(at(1, 0, 0)), Some(at(31, 0, 0))),
        )
        .await?;
        assert!(range.tasks.is_empty());
        assert!(range.rejected.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_tasks_between_reads_store() -> Result<()> {
        let dir = tempdir()?;
        let config = StoreConfig::new(dir.path().to_owned()).with_log_mode(DailyLogMode::Append);

        for (day, description) in [(14, "monday"), (16, "wednesday")] {
            let store = TaskStore::new(config.clone(), at(day, 18, 0))?;
            store
                .set_task(
                    TaskDraft::new(description)
                        .starting_at(Some(at(day, 9, 0)))
                        .finishing_at(Some(at(day, 17, 0))),
                )
                .await?;
        }

        let store = TaskStore::new(config, at(17, 8, 0))?;
        let range = tasks_between(
            &store,
            RangeConfig::new(Some(at(14, 0, 0)), Some(at(17, 0, 0))),
        )
        .await?;
        assert_eq!(
            range.tasks,
            vec![
                TaskRecord::new(at(14, 9, 0), Some(at(14, 17, 0)), "monday"),
                TaskRecord::new(at(16, 9, 0), Some(at(16, 17, 0)), "wednesday"),
            ]
        );
        Ok(())
    }
}
