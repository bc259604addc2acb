use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::{Snapshot, SourceProject, SourceTask};
use crate::source::TaskSource;

/// Source data read from a file written by `tdsp fetch`, for offline runs.
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    pub fn open(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            projects = snapshot.projects.len(),
            tasks = snapshot.tasks.len(),
            "read source snapshot"
        );
        Ok(Self { snapshot })
    }
}

impl From<Snapshot> for SnapshotSource {
    fn from(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

impl TaskSource for SnapshotSource {
    fn projects(&self) -> Result<Vec<SourceProject>> {
        Ok(self.snapshot.projects.clone())
    }

    fn tasks(&self) -> Result<Vec<SourceTask>> {
        Ok(self.snapshot.tasks.clone())
    }
}
