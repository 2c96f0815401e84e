use std::{io::ErrorKind, path::Path};

use tokio::{
    fs::{self, File},
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tracing::debug;

/// Reads only the first line of a file. Missing files and files without any content give
/// `None`.
pub async fn read_first_line(path: &Path) -> Result<Option<String>, io::Error> {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut lines = BufReader::new(file).lines();
    let line = lines.next_line().await?;
    Ok(line.filter(|v| !v.trim().is_empty()))
}

/// Reads every line of a file, or `None` if there is no such file.
pub async fn read_lines(path: &Path) -> Result<Option<Vec<String>>, io::Error> {
    debug!("Extracting {path:?}");
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut lines = BufReader::new(file).lines();
    let mut result = vec![];
    while let Some(line) = lines.next_line().await? {
        result.push(line);
    }
    Ok(Some(result))
}

/// Replaces the whole content of a file with a single line.
pub async fn overwrite_line(path: &Path, line: &str) -> Result<(), io::Error> {
    debug!("Overwriting {path:?}");
    let mut file = File::create(path).await?;
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await
}

/// Adds a line to the end of a file, creating it if needed.
pub async fn append_line(path: &Path, line: &str) -> Result<(), io::Error> {
    debug!("Appending to {path:?}");
    let mut file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await
}

/// Removes a file. Returns whether there was anything to remove.
pub async fn remove_if_exists(path: &Path) -> Result<bool, io::Error> {
    match fs::remove_file(path).await {
        Ok(_) => {
            debug!("Removed {path:?}");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
