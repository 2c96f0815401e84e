//!  Storage is organized through [task_store::TaskStore].
//!  The basic idea is:
//!   - There is a root directory, `~/.ttimetracker` unless configured otherwise.
//!   - The task in progress lives in `root/current`, the one finished last in `root/last`.
//!   - Finished tasks are stored in daily logs, `root/<YYYY>/<MM>_<Mon>/<YYYY-MM-DD>.csv`, one
//!     line per task.

pub mod codec;
pub mod entities;
pub mod error;
pub mod paths;
pub mod task_store;
