//! Field registry: the author's named data slots

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The input control a form surface shows for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    #[default]
    Text,
    Multiline,
    ListBullets,
    ListChips,
    Email,
    Phone,
    Url,
    Date,
}

impl InputKind {
    /// Whether values of this kind are lists of strings
    pub fn is_list(&self) -> bool {
        matches!(self, InputKind::ListBullets | InputKind::ListChips)
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputKind::Text => "text",
            InputKind::Multiline => "multiline",
            InputKind::ListBullets => "list-bullets",
            InputKind::ListChips => "list-chips",
            InputKind::Email => "email",
            InputKind::Phone => "phone",
            InputKind::Url => "url",
            InputKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// A field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub label: String,
    #[serde(default, alias = "input_kind")]
    pub input_kind: InputKind,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, alias = "max_length", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl Field {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            input_kind: InputKind::Text,
            placeholder: String::new(),
            required: false,
            max_length: None,
        }
    }

    pub fn with_kind(mut self, kind: InputKind) -> Self {
        self.input_kind = kind;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

/// Ordered map of field id to definition; order is the author's order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRegistry {
    fields: IndexMap<String, Field>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in author order
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|s| s.as_str())
    }

    /// Create or edit a field
    ///
    /// `editing` names the field being edited, or None when creating. An id
    /// that already belongs to another field is rejected. Editing with a new
    /// id replaces the old entry in place; bindings are not touched here.
    pub fn upsert_field(&mut self, field: Field, editing: Option<&str>) -> Result<(), EngineError> {
        check_id(&field.id)?;
        match editing {
            None => {
                if self.fields.contains_key(&field.id) {
                    return Err(EngineError::validation(format!(
                        "field id '{}' already exists",
                        field.id
                    )));
                }
                tracing::debug!(field = %field.id, "created field");
                self.fields.insert(field.id.clone(), field);
            }
            Some(current) if current == field.id => {
                tracing::debug!(field = %field.id, "updated field");
                self.fields.insert(field.id.clone(), field);
            }
            Some(current) => {
                self.check_rename(current, &field.id)?;
                self.replace_entry(current, field);
            }
        }
        Ok(())
    }

    /// Change a field's id, keeping its position and definition
    pub fn rename_field(&mut self, old_id: &str, new_id: &str) -> Result<(), EngineError> {
        check_id(new_id)?;
        if old_id == new_id {
            if !self.fields.contains_key(old_id) {
                return Err(EngineError::field_not_found(old_id));
            }
            return Ok(());
        }
        self.check_rename(old_id, new_id)?;
        let mut field = self.fields[old_id].clone();
        field.id = new_id.to_string();
        self.replace_entry(old_id, field);
        Ok(())
    }

    /// Remove a field; unknown ids are ignored
    pub fn remove_field(&mut self, id: &str) -> Option<Field> {
        let removed = self.fields.shift_remove(id);
        if removed.is_some() {
            tracing::debug!(field = id, "removed field");
        }
        removed
    }

    fn check_rename(&self, old_id: &str, new_id: &str) -> Result<(), EngineError> {
        if !self.fields.contains_key(old_id) {
            return Err(EngineError::field_not_found(old_id));
        }
        if self.fields.contains_key(new_id) {
            return Err(EngineError::validation(format!(
                "field id '{}' already exists",
                new_id
            )));
        }
        Ok(())
    }

    fn replace_entry(&mut self, old_id: &str, field: Field) {
        let index = self.fields.get_index_of(old_id).unwrap_or(self.fields.len());
        self.fields.shift_remove(old_id);
        tracing::debug!(from = old_id, to = %field.id, "renamed field");
        self.fields.shift_insert(index, field.id.clone(), field);
    }

    /// Keys that disagree with the id stored in their definition
    pub(crate) fn mismatched_keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(key, field)| *key != &field.id)
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

fn check_id(id: &str) -> Result<(), EngineError> {
    if id.trim().is_empty() {
        return Err(EngineError::validation("field id must not be empty"));
    }
    Ok(())
}
