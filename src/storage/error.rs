use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the task store and the line codec.
///
/// Absence of a task is not an error; operations that may find nothing return an [Option].
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("Invalid task record: {0}")]
    InvalidRecord(String),
}

impl TaskError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

pub type TaskResult<T> = std::result::Result<T, TaskError>;
