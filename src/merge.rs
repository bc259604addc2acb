//! Folding mapped records into a backup document.
//!
//! A record whose id is new to its section is appended to `ids` and gets a
//! fresh entity (projects start from the field template, notes and tasks from
//! an empty object). Either way the record's own fields are then written over
//! the entity. Fields the record does not own, other entities and other
//! sections stay as they were, so running the same migration twice yields the
//! same document.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::document::BackupDocument;
use crate::error::{MigrateError, Result};
use crate::mapper::Mapping;
use crate::records::PersistedRecord;
use crate::store::template::ProjectTemplate;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionCounts {
    pub created: usize,
    pub updated: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub projects: SectionCounts,
    pub notes: SectionCounts,
    pub tasks: SectionCounts,
}

pub fn merge_into(
    document: &mut BackupDocument,
    template: &ProjectTemplate,
    mapping: &Mapping,
) -> Result<MergeReport> {
    let report = MergeReport {
        projects: merge_section(document, &mapping.projects, || template.instantiate())?,
        notes: merge_section(document, &mapping.notes, Map::new)?,
        tasks: merge_section(document, &mapping.tasks, Map::new)?,
    };
    tracing::debug!(?report, "merged mapped records");
    Ok(report)
}

fn merge_section<R, F>(
    document: &mut BackupDocument,
    records: &[R],
    new_entity: F,
) -> Result<SectionCounts>
where
    R: PersistedRecord,
    F: Fn() -> Map<String, Value>,
{
    let mut counts = SectionCounts::default();
    let mut known: HashSet<String> = document
        .ids(R::SECTION)
        .into_iter()
        .map(str::to_string)
        .collect();

    for record in records {
        let id = record.id();
        let fields = record.persisted_fields()?;

        let is_new = known.insert(id.to_string());
        if is_new {
            document.ids_mut(R::SECTION)?.push(Value::String(id.to_string()));
            counts.created += 1;
        } else {
            counts.updated += 1;
        }

        // A listed id without an entity is initialized too.
        let entity = match document.entities_mut(R::SECTION)?.entry(id.to_string()) {
            Entry::Occupied(mut slot) if is_new => {
                slot.insert(Value::Object(new_entity()));
                slot.into_mut()
            }
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => slot.insert(Value::Object(new_entity())),
        };
        let Value::Object(entity) = entity else {
            return Err(MigrateError::MalformedBackup(format!(
                "'{}.entities.{id}' is not an object",
                R::SECTION
            )));
        };

        for (key, value) in fields {
            entity.insert(key, value);
        }
    }

    Ok(counts)
}
