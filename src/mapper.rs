//! Conversion of source projects and tasks into backup records.
//!
//! Regular source projects map one-to-one onto target projects. Projects
//! named as collection projects are not migrated themselves: each of their
//! top-level tasks becomes a project of its own, and everything below that
//! task lands inside it.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::Result;
use crate::ids;
use crate::model::{SourceProject, SourceTask};
use crate::records::{NoteRecord, ProjectRecord, TaskRecord};
use crate::tags::TagResolver;
use crate::timestamp::{due_to_epoch, parse_epoch};

/// Set of project names whose top-level tasks are promoted to projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionProjects {
    names: HashSet<String>,
}

impl CollectionProjects {
    /// Stands in for a space in names given on the command line.
    pub const SPACE_PLACEHOLDER: &'static str = "__";

    /// Parse a comma-separated list such as `Someday__Maybe,Projects`.
    pub fn parse(list: &str) -> Self {
        Self::from_names(list.split(','))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().replace(Self::SPACE_PLACEHOLDER, " "))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    pub fn contains(&self, project_name: &str) -> bool {
        self.names.contains(project_name)
    }
}

pub struct MapInput<'a> {
    pub projects: &'a [SourceProject],
    pub tasks: &'a [SourceTask],
    pub collections: &'a CollectionProjects,
    pub tags: &'a TagResolver,
}

/// Source data that could not be mapped cleanly. The offending task is
/// skipped (or left unlinked) and the run carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingWarning {
    /// The task's project was neither fetched as a regular project nor
    /// reachable through a collection container.
    UnresolvedProject { task_id: String, project_id: String },
    /// The task's parent is not among the migrated tasks.
    MissingParent { task_id: String, parent_id: String },
}

#[derive(Debug, Clone, Default)]
pub struct Mapping {
    pub projects: Vec<ProjectRecord>,
    pub notes: Vec<NoteRecord>,
    pub tasks: Vec<TaskRecord>,
    pub warnings: Vec<MappingWarning>,
    pub skipped_completed: usize,
}

/// Source-id indexes shared by the mapping phases.
struct Index<'a> {
    /// Regular source project id -> target project id.
    regular_projects: HashMap<&'a str, String>,
    /// Container task id -> synthesized project id.
    containers: HashMap<&'a str, String>,
    /// Open tasks by source id.
    tasks: HashMap<&'a str, &'a SourceTask>,
}

impl Index<'_> {
    fn owning_project(&self, task: &SourceTask) -> Option<String> {
        if let Some(container) = task
            .parent_id
            .as_deref()
            .and_then(|parent| self.containers.get(parent))
        {
            return Some(container.clone());
        }

        if let Some(project) = self.regular_projects.get(task.project_id.as_str()) {
            return Some(project.clone());
        }

        // Inside a collection project: the nearest container at or above the task.
        let mut current = task;
        for _ in 0..=self.tasks.len() {
            if let Some(container) = self.containers.get(current.id.as_str()) {
                return Some(container.clone());
            }
            current = self.tasks.get(current.parent_id.as_deref()?).copied()?;
        }
        None
    }
}

pub fn map_entities(input: &MapInput<'_>) -> Result<Mapping> {
    let mut mapping = Mapping::default();
    let mut project_slots: HashMap<String, usize> = HashMap::new();

    let open: Vec<&SourceTask> = input.tasks.iter().filter(|t| !t.is_completed).collect();
    mapping.skipped_completed = input.tasks.len() - open.len();

    let mut index = Index {
        regular_projects: HashMap::new(),
        containers: HashMap::new(),
        tasks: open.iter().map(|task| (task.id.as_str(), *task)).collect(),
    };

    let mut collection_ids = HashSet::new();
    for project in input.projects {
        if input.collections.contains(&project.name) {
            collection_ids.insert(project.id.as_str());
            continue;
        }
        let id = ids::project_id(&project.id);
        index.regular_projects.insert(project.id.as_str(), id.clone());
        project_slots.insert(id.clone(), mapping.projects.len());
        mapping
            .projects
            .push(ProjectRecord::new(id, project.name.clone()));
    }

    for task in open.iter().filter(|t| t.is_top_level()) {
        if !collection_ids.contains(task.project_id.as_str()) {
            continue;
        }
        let id = ids::subtask_project_id(&task.project_id, &task.id);
        let mut project = ProjectRecord::new(id.clone(), task.content.clone());

        if !task.description.is_empty() {
            let created = parse_epoch(&task.created_at)?;
            let note = NoteRecord {
                id: ids::note_id(&task.id),
                project_id: id.clone(),
                content: task.description.clone(),
                is_pinned_to_today: false,
                created,
                modified: created,
            };
            project.note_ids.push(note.id.clone());
            mapping.notes.push(note);
        }

        index.containers.insert(task.id.as_str(), id.clone());
        project_slots.insert(id, mapping.projects.len());
        mapping.projects.push(project);
    }

    tracing::debug!(
        regular = index.regular_projects.len(),
        synthesized = index.containers.len(),
        collections = collection_ids.len(),
        "projects mapped"
    );

    // Phase 1: one record per open task, linked to its project only.
    let mut task_slots: HashMap<&str, usize> = HashMap::new();
    for task in &open {
        let Some(project_id) = index.owning_project(task) else {
            tracing::warn!(
                task_id = %task.id,
                project_id = %task.project_id,
                "skipping task whose project was not migrated"
            );
            mapping.warnings.push(MappingWarning::UnresolvedProject {
                task_id: task.id.clone(),
                project_id: task.project_id.clone(),
            });
            continue;
        };

        let mut record = TaskRecord::open(
            ids::task_id(&task.id),
            project_id.clone(),
            task.content.clone(),
            parse_epoch(&task.created_at)?,
        );
        record.notes = task.description.clone();
        record.tag_ids = input.tags.resolve(&task.labels);
        record.planned_at = due_to_epoch(task.due.as_ref())?;

        if let Some(&slot) = project_slots.get(&project_id) {
            mapping.projects[slot].task_ids.push(record.id.clone());
        }
        task_slots.insert(task.id.as_str(), mapping.tasks.len());
        mapping.tasks.push(record);
    }

    // Phase 2: parent/child links, set on both ends.
    for task in &open {
        let (Some(parent_source_id), Some(&child)) =
            (task.parent_id.as_deref(), task_slots.get(task.id.as_str()))
        else {
            continue;
        };

        let Some(&parent) = task_slots.get(parent_source_id) else {
            tracing::warn!(
                task_id = %task.id,
                parent_id = %parent_source_id,
                "parent task was not migrated; keeping task at top level"
            );
            mapping.warnings.push(MappingWarning::MissingParent {
                task_id: task.id.clone(),
                parent_id: parent_source_id.to_string(),
            });
            continue;
        };

        let child_id = mapping.tasks[child].id.clone();
        let parent_id = mapping.tasks[parent].id.clone();
        mapping.tasks[child].parent_id = Some(parent_id);
        mapping.tasks[parent].sub_task_ids.push(child_id);
    }

    tracing::debug!(
        tasks = mapping.tasks.len(),
        notes = mapping.notes.len(),
        skipped_completed = mapping.skipped_completed,
        warnings = mapping.warnings.len(),
        "tasks mapped"
    );

    Ok(mapping)
}
