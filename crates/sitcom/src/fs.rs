//! File system helpers. Failures carry the path involved.

use crate::error::{Error, Result};
use std::io;
use std::path::Path;

pub(crate) async fn read_to_string(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| Error::io(path, err))
}

/// Reads `path` when it is a file.
pub(crate) async fn read_if_exists(path: &Path) -> Result<Option<String>> {
    if !is_file(path).await {
        return Ok(None);
    }
    read_to_string(path).await.map(Some)
}

/// Writes `contents`, creating parent directories.
pub(crate) async fn write(path: &Path, contents: &str) -> Result<()> {
    make_parent(path).await.map_err(|err| Error::io(path, err))?;
    tokio::fs::write(path, contents)
        .await
        .map_err(|err| Error::io(path, err))
}

/// Copies `from` to `to` byte for byte, creating parent directories.
pub(crate) async fn copy(from: &Path, to: &Path) -> io::Result<()> {
    make_parent(to).await?;
    tokio::fs::copy(from, to).await.map(|_| ())
}

async fn make_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::create_dir_all(dir).await,
        _ => Ok(()),
    }
}

pub(crate) async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

pub(crate) async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_dir())
}
