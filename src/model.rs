use serde::{Deserialize, Serialize};

/// A project as returned by the source service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceProject {
    pub id: String,
    pub name: String,
}

/// Due information of a source task. `date` is always present; `datetime`
/// only when the task is due at a specific time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Due {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceTask {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub project_id: String,
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<Due>,
    #[serde(default)]
    pub is_completed: bool,
}

impl SourceTask {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Projects and tasks captured from the source in one go. This is also the
/// on-disk format written by `tdsp fetch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<SourceProject>,
    #[serde(default)]
    pub tasks: Vec<SourceTask>,
}
