use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::utils::{
    dir::ensure_dir_all,
    time::{date_to_month_dir, date_to_record_name, date_to_year_dir},
};

use super::error::{TaskError, TaskResult};

pub const DAILY_LOG_EXTENSION: &str = "csv";

/// Where the log of a certain day lives: `root/<YYYY>/<MM>_<Mon>/<YYYY-MM-DD>.csv`.
///
/// Always recomputed from a date, so crossing midnight can't leave a stale location behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    pub subdirectory: PathBuf,
    pub daily_log: PathBuf,
}

impl StoreLocation {
    pub fn resolve(root: &Path, date: NaiveDate) -> Self {
        let subdirectory = root
            .join(date_to_year_dir(date))
            .join(date_to_month_dir(date));
        let daily_log = subdirectory
            .join(date_to_record_name(date))
            .with_extension(DAILY_LOG_EXTENSION);
        Self {
            subdirectory,
            daily_log,
        }
    }

    /// Same as [StoreLocation::resolve], but also makes sure the subdirectory exists.
    pub fn create(root: &Path, date: NaiveDate) -> TaskResult<Self> {
        let location = Self::resolve(root, date);
        ensure_dir_all(&location.subdirectory)
            .map_err(|e| TaskError::filesystem(&location.subdirectory, e))?;
        Ok(location)
    }
}
