use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

/// Copy an existing file aside before it gets overwritten.
/// Naming: mirrorlist -> mirrorlist.bak.TIMESTAMP
///
/// Returns the backup path, or `None` when there was nothing to back up.
pub async fn backup_file(path: &Path) -> Result<Option<PathBuf>> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Ok(None);
    }

    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let backup_path = path.with_file_name(format!("{}.bak.{}", file_name, timestamp));

    fs::copy(path, &backup_path).await?;
    tracing::info!("backup created at {:?}", backup_path);
    Ok(Some(backup_path))
}
