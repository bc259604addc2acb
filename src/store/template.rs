use std::fs;
use std::path::Path;

use serde_json::{Map, Value, json};

use crate::error::{MigrateError, Result};

/// Template looked up in the working directory when no path is given.
pub const DEFAULT_TEMPLATE_PATH: &str = "standard_project_fields.json";

/// Default fields for project entities created by a migration. Only used
/// when a project id is new to the backup; existing projects keep whatever
/// the application stored for these fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTemplate {
    fields: Map<String, Value>,
}

impl ProjectTemplate {
    pub fn builtin() -> Self {
        let mut fields = Map::new();
        fields.insert("isHiddenFromMenu".into(), json!(false));
        fields.insert("isArchived".into(), json!(false));
        for list in ["taskIds", "backlogTaskIds", "noteIds"] {
            fields.insert(list.into(), json!([]));
        }
        for tracking in ["workStart", "workEnd", "breakTime", "breakNr"] {
            fields.insert(tracking.into(), json!({}));
        }
        Self { fields }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(MigrateError::MalformedTemplate(format!(
                "expected a JSON object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MigrateError::TemplateNotFound(path.display().to_string()));
        }
        let raw = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw).map_err(|err| {
            MigrateError::MalformedTemplate(format!("{}: {err}", path.display()))
        })?;
        Self::from_value(value)
    }

    /// An explicit path must exist. Without one, the default file is used if
    /// present and the built-in fields otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default = Path::new(DEFAULT_TEMPLATE_PATH);
        if default.exists() {
            tracing::debug!(path = %default.display(), "using project template from working directory");
            Self::load(default)
        } else {
            Ok(Self::builtin())
        }
    }

    pub fn instantiate(&self) -> Map<String, Value> {
        self.fields.clone()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
