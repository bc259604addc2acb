use std::fs;
use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use crate::document::BackupDocument;
use crate::error::{MigrateError, Result};

/// Output file name used when none is given.
pub const DEFAULT_OUTPUT_PATH: &str = "super_productivity_updated_backup_file.json";

/// Read a prior backup, or start from an empty document when there is none.
pub fn load(path: Option<&Path>) -> Result<BackupDocument> {
    let Some(path) = path else {
        tracing::info!("no prior backup given; starting from an empty document");
        return Ok(BackupDocument::empty());
    };

    let raw = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|err| MigrateError::MalformedBackup(format!("{}: {err}", path.display())))?;
    let document = BackupDocument::from_value(value)?;
    tracing::info!(
        path = %path.display(),
        projects = document.ids("project").len(),
        tasks = document.ids("task").len(),
        enveloped = document.is_enveloped(),
        "loaded prior backup"
    );
    Ok(document)
}

/// Serialize `value` next to `path` and rename it into place, so a failed
/// run never leaves a truncated file behind.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup.json".to_string());
    let staging = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

    if let Err(err) = fs::write(&staging, json) {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }
    if let Err(err) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }
    Ok(())
}
