use std::{env, io, path::{Path, PathBuf}};

use anyhow::{Context, Result};

pub const DEFAULT_DIR_NAME: &str = ".ttimetracker";

/// Default root of the task store, `~/.ttimetracker`.
pub fn application_default_path() -> Result<PathBuf> {
    let home = {
        #[cfg(windows)]
        {
            env::var("USERPROFILE").context("USERPROFILE should be present on Windows")?
        }
        #[cfg(not(windows))]
        {
            env::var("HOME").context("Couldn't find HOME")?
        }
    };
    let mut path = PathBuf::from(home);
    path.push(DEFAULT_DIR_NAME);
    Ok(path)
}

/// Creates a directory along with all of its missing parents. Does nothing if it already exists.
/// Equivalent to `mkdir -p`.
pub fn ensure_dir_all(path: &Path) -> io::Result<()> {
    match std::fs::create_dir_all(path) {
        Ok(_) => Ok(()),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(v) => Err(v),
    }
}
