//! Records written into the backup document.
//!
//! Each record type carries an explicit list of the fields it owns in the
//! persisted entity. The merge engine writes exactly those fields and leaves
//! everything else on an existing entity alone.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{MigrateError, Result};

/// Value of `_showSubTasksMode` for migrated tasks (subtasks expanded).
pub const SHOW_SUBTASKS_EXPANDED: u8 = 2;

/// A record the merge engine can fold into a backup section.
pub trait PersistedRecord: Serialize {
    /// Name of the backup section (`project`, `note`, `task`).
    const SECTION: &'static str;
    /// Fields this record owns on the persisted entity.
    const PERSISTED_FIELDS: &'static [&'static str];

    fn id(&self) -> &str;

    /// The owned fields, serialized.
    fn persisted_fields(&self) -> Result<Map<String, Value>> {
        let Value::Object(mut fields) = serde_json::to_value(self)? else {
            return Err(MigrateError::Json(serde::ser::Error::custom(format!(
                "{} record did not serialize to an object",
                Self::SECTION
            ))));
        };
        fields.retain(|key, _| Self::PERSISTED_FIELDS.contains(&key.as_str()));
        Ok(fields)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub task_ids: Vec<String>,
    pub note_ids: Vec<String>,
}

impl ProjectRecord {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            task_ids: Vec::new(),
            note_ids: Vec::new(),
        }
    }
}

impl PersistedRecord for ProjectRecord {
    const SECTION: &'static str = "project";
    const PERSISTED_FIELDS: &'static [&'static str] = &["id", "title", "taskIds", "noteIds"];

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: String,
    pub project_id: String,
    pub content: String,
    pub is_pinned_to_today: bool,
    pub created: i64,
    pub modified: i64,
}

impl PersistedRecord for NoteRecord {
    const SECTION: &'static str = "note";
    const PERSISTED_FIELDS: &'static [&'static str] = &[
        "id",
        "projectId",
        "content",
        "isPinnedToToday",
        "created",
        "modified",
    ];

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub project_id: String,
    pub parent_id: Option<String>,
    pub sub_task_ids: Vec<String>,
    pub created: i64,
    pub title: String,
    pub notes: String,
    pub tag_ids: Vec<String>,
    pub planned_at: Option<i64>,
    pub is_done: bool,
    pub done_on: Option<i64>,
    pub time_spent: u64,
    pub time_estimate: u64,
    pub reminder_id: Option<String>,
    pub repeat_cfg_id: Option<String>,
    pub attachments: Vec<Value>,
    pub issue_id: Option<String>,
    pub issue_points: Option<u32>,
    pub issue_type: Option<String>,
    pub issue_attachment_nr: Option<u32>,
    pub issue_last_updated: Option<i64>,
    pub issue_was_updated: Option<bool>,
    #[serde(rename = "_showSubTasksMode")]
    pub show_sub_tasks_mode: u8,
}

impl TaskRecord {
    /// An open, untracked task. Done state, time tracking and issue links
    /// always start out cleared.
    pub fn open(id: String, project_id: String, title: String, created: i64) -> Self {
        Self {
            id,
            project_id,
            parent_id: None,
            sub_task_ids: Vec::new(),
            created,
            title,
            notes: String::new(),
            tag_ids: Vec::new(),
            planned_at: None,
            is_done: false,
            done_on: None,
            time_spent: 0,
            time_estimate: 0,
            reminder_id: None,
            repeat_cfg_id: None,
            attachments: Vec::new(),
            issue_id: None,
            issue_points: None,
            issue_type: None,
            issue_attachment_nr: None,
            issue_last_updated: None,
            issue_was_updated: None,
            show_sub_tasks_mode: SHOW_SUBTASKS_EXPANDED,
        }
    }
}

impl PersistedRecord for TaskRecord {
    const SECTION: &'static str = "task";
    const PERSISTED_FIELDS: &'static [&'static str] = &[
        "id",
        "projectId",
        "parentId",
        "subTaskIds",
        "created",
        "title",
        "notes",
        "tagIds",
        "plannedAt",
        "isDone",
        "doneOn",
        "timeSpent",
        "timeEstimate",
        "reminderId",
        "repeatCfgId",
        "attachments",
        "issueId",
        "issuePoints",
        "issueType",
        "issueAttachmentNr",
        "issueLastUpdated",
        "issueWasUpdated",
        "_showSubTasksMode",
    ];

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<R: PersistedRecord>(record: &R) -> Vec<String> {
        let Value::Object(map) = serde_json::to_value(record).unwrap() else {
            panic!("record should serialize to an object");
        };
        map.keys().cloned().collect()
    }

    #[test]
    fn serialized_keys_match_allow_lists() {
        let project = ProjectRecord::new("p".into(), "Inbox".into());
        assert_eq!(keys(&project), ProjectRecord::PERSISTED_FIELDS);

        let note = NoteRecord {
            id: "n".into(),
            project_id: "p".into(),
            content: "body".into(),
            is_pinned_to_today: false,
            created: 1,
            modified: 1,
        };
        assert_eq!(keys(&note), NoteRecord::PERSISTED_FIELDS);

        let task = TaskRecord::open("t".into(), "p".into(), "Do it".into(), 1);
        assert_eq!(keys(&task), TaskRecord::PERSISTED_FIELDS);
    }

    #[test]
    fn open_task_is_not_done_and_untracked() {
        let task = TaskRecord::open("t".into(), "p".into(), "Do it".into(), 7);
        let fields = task.persisted_fields().unwrap();
        assert_eq!(fields["isDone"], Value::Bool(false));
        assert_eq!(fields["timeSpent"], 0);
        assert_eq!(fields["timeEstimate"], 0);
        assert_eq!(fields["parentId"], Value::Null);
        assert_eq!(fields["plannedAt"], Value::Null);
        assert_eq!(fields["_showSubTasksMode"], 2);
    }
}
