//! Value objects filled in by the author
//!
//! Values are keyed by field id (scalars and string lists) or by repeat node
//! id (lists of nested objects). Nothing enforces a shape: missing keys
//! read as empty, stray JSON scalars are accepted as text, and input that
//! fits no variant degrades instead of failing the whole object.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// A nested mapping of field or repeat ids to values
///
/// Keys are kept sorted so that serialization and iteration are stable.
pub type ValueObject = BTreeMap<String, Value>;

/// One entry of a value object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Scalar text
    Text(String),
    /// Entries of a repeat, one object per instance
    Items(Vec<ValueObject>),
    /// A list-valued field (bullets, chips)
    Strings(Vec<String>),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Repeat entries; anything else reads as an empty list
    pub fn as_items(&self) -> &[ValueObject] {
        match self {
            Value::Items(items) => items,
            _ => &[],
        }
    }

    /// True for empty text, empty lists and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(s) => s.trim().is_empty(),
            Value::Items(items) => items.is_empty(),
            Value::Strings(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    /// Field content as a list of entries
    ///
    /// Text is split on newlines so a multi-line answer can feed a bullet
    /// list. Blank entries are dropped.
    pub fn entries(&self) -> Vec<&str> {
        match self {
            Value::Text(s) => s.lines().map(str::trim).filter(|l| !l.is_empty()).collect(),
            Value::Strings(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect(),
            Value::Items(_) => vec![],
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<ValueObject>> for Value {
    fn from(items: Vec<ValueObject>) -> Self {
        Value::Items(items)
    }
}

/// Text stored under `key`, or "" when absent or not text
pub fn text_at<'a>(values: &'a ValueObject, key: &str) -> &'a str {
    values.get(key).and_then(Value::as_text).unwrap_or("")
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, a list of strings or a list of objects")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Text(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Text(String::new()))
    }

    /// A lone object is a repeat with a single entry
    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Value, A::Error> {
        let object = ValueObject::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(Value::Items(vec![object]))
    }

    /// Mixed lists keep their objects; nested lists are skipped
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut strings = Vec::new();
        let mut objects = Vec::new();
        while let Some(element) = seq.next_element::<Element>()? {
            match element {
                Element::Scalar(s) => strings.push(s),
                Element::Object(o) => objects.push(o),
                Element::Skipped => {}
            }
        }
        if strings.is_empty() || !objects.is_empty() {
            if !strings.is_empty() {
                tracing::debug!(dropped = strings.len(), "text entries dropped from a list of objects");
            }
            return Ok(Value::Items(objects));
        }
        Ok(Value::Strings(strings))
    }
}

/// A list element: scalar text, a nested object, or something ignored
enum Element {
    Scalar(String),
    Object(ValueObject),
    Skipped,
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ElementVisitor)
    }
}

struct ElementVisitor;

impl<'de> Visitor<'de> for ElementVisitor {
    type Value = Element;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or an object")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Element, E> {
        Ok(Element::Scalar(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Element, E> {
        Ok(Element::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Element, E> {
        Ok(Element::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Element, E> {
        Ok(Element::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Element, E> {
        Ok(Element::Scalar(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Element, E> {
        Ok(Element::Scalar(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Element, E> {
        Ok(Element::Scalar(String::new()))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Element, A::Error> {
        let object = ValueObject::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(Element::Object(object))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Element, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(Element::Skipped)
    }
}
