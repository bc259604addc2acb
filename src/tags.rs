use std::collections::HashMap;

use serde_json::Value;

/// Maps source label names onto tags that already exist in the backup.
/// Tags are never created; labels without a matching tag title are dropped.
#[derive(Debug, Clone, Default)]
pub struct TagResolver {
    by_title: HashMap<String, String>,
}

impl TagResolver {
    /// Build the lookup from the `tag` section of a backup document. A
    /// document without that section yields an empty resolver.
    pub fn from_document(document: &Value) -> Self {
        let mut by_title = HashMap::new();

        let Some(entities) = document
            .get("tag")
            .and_then(|section| section.get("entities"))
            .and_then(Value::as_object)
        else {
            return Self { by_title };
        };

        for (id, tag) in entities {
            match tag.get("title").and_then(Value::as_str) {
                Some(title) => {
                    by_title.insert(title.to_string(), id.clone());
                }
                None => tracing::debug!(tag_id = %id, "skipping tag without a title"),
            }
        }

        Self { by_title }
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    /// Tag ids for `labels`, in label order.
    pub fn resolve(&self, labels: &[String]) -> Vec<String> {
        labels
            .iter()
            .filter_map(|label| self.by_title.get(label).cloned())
            .collect()
    }
}
