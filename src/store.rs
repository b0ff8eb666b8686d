//! Persistence boundary
//!
//! The engine never touches storage itself. Hosts implement
//! [`DocumentStore`] over whatever keeps their JSON documents; the helpers
//! here move templates and filled values across that boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use thiserror::Error;

use crate::scope::ValueObject;
use crate::template::{DocumentError, TemplateDocument};

/// Collection holding template documents
pub const TEMPLATES: &str = "templates";
/// Collection holding filled value objects
pub const FILLED: &str = "filled";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document '{key}' not found in '{collection}'")]
    Missing { collection: String, key: String },

    #[error("failed to convert document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("storage backend failed: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn missing(collection: impl Into<String>, key: impl Into<String>) -> Self {
        StoreError::Missing {
            collection: collection.into(),
            key: key.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend {
            message: message.into(),
        }
    }
}

/// Key-addressed JSON document storage
///
/// No transactions: each call stands alone, and the last `put` for a key
/// wins.
pub trait DocumentStore {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Json>, StoreError>;

    fn put(&mut self, collection: &str, key: &str, document: Json) -> Result<(), StoreError>;

    /// Documents whose top-level `field` equals `value`, ordered by key
    fn query_eq(&self, collection: &str, field: &str, value: &Json) -> Result<Vec<(String, Json)>, StoreError>;
}

/// In-process store, mainly for tests and the CLI
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: BTreeMap<String, BTreeMap<String, Json>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, BTreeMap::len)
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Json>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    fn put(&mut self, collection: &str, key: &str, document: Json) -> Result<(), StoreError> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), document);
        Ok(())
    }

    fn query_eq(&self, collection: &str, field: &str, value: &Json) -> Result<Vec<(String, Json)>, StoreError> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(vec![]);
        };
        Ok(docs
            .iter()
            .filter(|(_, doc)| doc.get(field) == Some(value))
            .map(|(key, doc)| (key.clone(), doc.clone()))
            .collect())
    }
}

/// Values filled in for one document, tied to the template they fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledDocument {
    pub id: String,
    pub template_id: String,
    #[serde(default)]
    pub values: ValueObject,
}

pub fn save_template(store: &mut impl DocumentStore, template: &TemplateDocument) -> Result<(), StoreError> {
    store.put(TEMPLATES, &template.id, serde_json::to_value(template)?)
}

/// Load a template with the same checks as [`TemplateDocument::from_json`]
pub fn load_template(store: &impl DocumentStore, id: &str) -> Result<TemplateDocument, StoreError> {
    let json = store
        .get(TEMPLATES, id)?
        .ok_or_else(|| StoreError::missing(TEMPLATES, id))?;
    let template: TemplateDocument = serde_json::from_value(json)?;
    template.check_loaded()?;
    Ok(template)
}

pub fn save_filled(store: &mut impl DocumentStore, filled: &FilledDocument) -> Result<(), StoreError> {
    store.put(FILLED, &filled.id, serde_json::to_value(filled)?)
}

/// Every filled document for a template, ordered by document id
pub fn filled_for_template(store: &impl DocumentStore, template_id: &str) -> Result<Vec<FilledDocument>, StoreError> {
    store
        .query_eq(FILLED, "templateId", &Json::from(template_id))?
        .into_iter()
        .map(|(_, json)| serde_json::from_value(json).map_err(StoreError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Value;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_put_get_overwrite() {
        let mut store = MemoryStore::new();
        store.put("c", "k", json!({"a": 1})).unwrap();
        store.put("c", "k", json!({"a": 2})).unwrap();
        assert_eq!(store.get("c", "k").unwrap(), Some(json!({"a": 2})));
        assert_eq!(store.get("c", "other").unwrap(), None);
        assert_eq!(store.get("nope", "k").unwrap(), None);
        assert_eq!(store.len("c"), 1);
    }

    #[test]
    fn test_query_eq_filters_top_level() {
        let mut store = MemoryStore::new();
        store.put("c", "b", json!({"kind": "x"})).unwrap();
        store.put("c", "a", json!({"kind": "x"})).unwrap();
        store.put("c", "c", json!({"kind": "y"})).unwrap();
        store.put("c", "d", json!("not an object")).unwrap();
        let keys: Vec<String> = store
            .query_eq("c", "kind", &json!("x"))
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_template_round_trip() {
        let mut store = MemoryStore::new();
        let template = TemplateDocument::new("cv");
        save_template(&mut store, &template).unwrap();
        assert_eq!(load_template(&store, "cv").unwrap(), template);
        assert!(matches!(
            load_template(&store, "missing"),
            Err(StoreError::Missing { .. })
        ));
    }

    #[test]
    fn test_load_rejects_future_schema() {
        let mut store = MemoryStore::new();
        store
            .put(TEMPLATES, "cv", json!({"id": "cv", "schema_version": 7}))
            .unwrap();
        assert!(matches!(
            load_template(&store, "cv"),
            Err(StoreError::Document(DocumentError::UnsupportedSchema { found: 7, .. }))
        ));
    }

    #[test]
    fn test_load_rejects_mismatched_field_key() {
        let mut store = MemoryStore::new();
        let stored = json!({
            "id": "cv",
            "schemaVersion": 1,
            "fields": { "email": { "id": "mail", "label": "Email" } }
        });
        store.put(TEMPLATES, "cv", stored.clone()).unwrap();

        let from_store = load_template(&store, "cv").unwrap_err();
        assert!(matches!(
            from_store,
            StoreError::Document(DocumentError::Invalid(ref e)) if e.is_validation()
        ));
        let from_json = TemplateDocument::from_json(&stored.to_string()).unwrap_err();
        assert_eq!(from_store.to_string(), StoreError::from(from_json).to_string());
    }

    #[test]
    fn test_filled_documents_by_template() {
        let mut store = MemoryStore::new();
        for (id, template_id) in [("d2", "cv"), ("d1", "cv"), ("d3", "letter")] {
            let filled = FilledDocument {
                id: id.to_string(),
                template_id: template_id.to_string(),
                values: [("full_name".to_string(), Value::text(id))].into_iter().collect(),
            };
            save_filled(&mut store, &filled).unwrap();
        }
        let found = filled_for_template(&store, "cv").unwrap();
        let ids: Vec<&str> = found.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
        assert_eq!(found[0].values["full_name"], Value::text("d1"));
    }
}
