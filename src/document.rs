//! The backup document: a JSON object keyed by entity kind, each kind holding
//! an ordered `ids` list and an `entities` map.
//!
//! Newer exports wrap the sections in a `data` envelope next to sync
//! metadata. Both layouts are accepted and written back unchanged apart from
//! the merged sections.

use serde_json::{Map, Value, json};

use crate::error::{MigrateError, Result};

/// Sections the migrator writes into.
pub const MANAGED_SECTIONS: [&str; 3] = ["project", "note", "task"];

const ENVELOPE_KEY: &str = "data";

#[derive(Debug, Clone, PartialEq)]
pub struct BackupDocument {
    root: Value,
    enveloped: bool,
}

impl BackupDocument {
    /// A fresh document with empty managed sections.
    pub fn empty() -> Self {
        let mut sections = Map::new();
        for name in MANAGED_SECTIONS {
            sections.insert(name.to_string(), json!({"ids": [], "entities": {}}));
        }
        Self {
            root: Value::Object(sections),
            enveloped: false,
        }
    }

    /// Wrap a parsed backup, rejecting anything the merge could not fold
    /// into safely.
    pub fn from_value(root: Value) -> Result<Self> {
        let Some(object) = root.as_object() else {
            return Err(MigrateError::MalformedBackup(
                "top level is not a JSON object".into(),
            ));
        };

        let enveloped = !object.contains_key("project")
            && object
                .get(ENVELOPE_KEY)
                .and_then(|data| data.get("project"))
                .is_some();

        let document = Self { root, enveloped };
        let content = document.content();
        for name in MANAGED_SECTIONS {
            let Some(section) = content.get(name) else {
                return Err(MigrateError::MalformedBackup(format!(
                    "missing '{name}' section"
                )));
            };
            validate_section(name, section)?;
        }
        if let Some(tags) = content.get("tag") {
            validate_tag_section(tags)?;
        }

        Ok(document)
    }

    /// The object holding the entity sections.
    pub fn content(&self) -> &Value {
        if self.enveloped {
            &self.root[ENVELOPE_KEY]
        } else {
            &self.root
        }
    }

    pub fn is_enveloped(&self) -> bool {
        self.enveloped
    }

    pub fn ids(&self, section: &str) -> Vec<&str> {
        self.content()
            .get(section)
            .and_then(|s| s.get("ids"))
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn entity(&self, section: &str, id: &str) -> Option<&Value> {
        self.content().get(section)?.get("entities")?.get(id)
    }

    pub(crate) fn ids_mut(&mut self, section: &str) -> Result<&mut Vec<Value>> {
        self.section_mut(section)?
            .get_mut("ids")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| MigrateError::MalformedBackup(format!("'{section}.ids' is not a list")))
    }

    pub(crate) fn entities_mut(&mut self, section: &str) -> Result<&mut Map<String, Value>> {
        self.section_mut(section)?
            .get_mut("entities")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                MigrateError::MalformedBackup(format!("'{section}.entities' is not an object"))
            })
    }

    fn section_mut(&mut self, section: &str) -> Result<&mut Map<String, Value>> {
        let content = if self.enveloped {
            &mut self.root[ENVELOPE_KEY]
        } else {
            &mut self.root
        };
        content
            .get_mut(section)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| MigrateError::MalformedBackup(format!("missing '{section}' section")))
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}

fn validate_section(name: &str, section: &Value) -> Result<()> {
    let ids = section.get("ids").and_then(Value::as_array).ok_or_else(|| {
        MigrateError::MalformedBackup(format!("'{name}.ids' is missing or not a list"))
    })?;
    if ids.iter().any(|id| !id.is_string()) {
        return Err(MigrateError::MalformedBackup(format!(
            "'{name}.ids' contains a non-string id"
        )));
    }
    if !section.get("entities").is_some_and(Value::is_object) {
        return Err(MigrateError::MalformedBackup(format!(
            "'{name}.entities' is missing or not an object"
        )));
    }
    Ok(())
}

/// Tags are only read, so the section needs no `ids` list.
fn validate_tag_section(section: &Value) -> Result<()> {
    if !section.is_object() {
        return Err(MigrateError::MalformedBackup(
            "'tag' section is not an object".into(),
        ));
    }
    if section.get("entities").is_some_and(|e| !e.is_object()) {
        return Err(MigrateError::MalformedBackup(
            "'tag.entities' is not an object".into(),
        ));
    }
    Ok(())
}
