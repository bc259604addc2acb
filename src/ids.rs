//! Deterministic target identifiers.
//!
//! Every id written into the backup is derived from the kind of entity and
//! the source id(s) it came from. Re-running a migration against the same
//! source data therefore lands on the same ids and updates records in place
//! instead of duplicating them.

use std::fmt;

const PREFIX: &str = "TDI";

/// The four id families minted by the migrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    SubtaskProject,
    Task,
    NoteFromTaskDescription,
}

impl EntityKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::SubtaskProject => "subtask_project",
            Self::Task => "task",
            Self::NoteFromTaskDescription => "note_from_task_description",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", PREFIX, self.tag())
    }
}

/// Target id of a regular source project.
pub fn project_id(source_project_id: &str) -> String {
    format!("{}_{}", EntityKind::Project, source_project_id)
}

/// Target id of the project synthesized from a top-level task of a
/// collection project.
pub fn subtask_project_id(source_project_id: &str, source_task_id: &str) -> String {
    format!(
        "{}_{}_{}",
        EntityKind::SubtaskProject,
        source_project_id,
        source_task_id
    )
}

pub fn task_id(source_task_id: &str) -> String {
    format!("{}_{}", EntityKind::Task, source_task_id)
}

/// Target id of the note carrying a container task's description.
pub fn note_id(source_task_id: &str) -> String {
    format!("{}_{}", EntityKind::NoteFromTaskDescription, source_task_id)
}
