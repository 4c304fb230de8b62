//! Flat resource state owned by the calling framework.
//!
//! A [`ResourceData`] carries the resource ID and a map of top-level
//! attributes. Nested `map` attributes (such as `request` or `options`) hold
//! string values, the way declarative configuration encodes them. Lookups
//! accept dotted paths: `request.method`, `assertions.0.target`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

/// Error returned when building state from a JSON document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// The document was not a JSON object.
    #[error("resource attributes must be a JSON object")]
    NotAnObject,
}

/// The local state of one resource instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: String,
    attributes: BTreeMap<String, Value>,
}

impl ResourceData {
    /// Creates empty state with no ID.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates state from a JSON object of attributes.
    ///
    /// # Example
    ///
    /// ```
    /// use synthetics_resource::ResourceData;
    ///
    /// let d = ResourceData::from_json(serde_json::json!({
    ///     "name": "homepage",
    ///     "request": { "method": "GET", "url": "https://example.com" }
    /// }))
    /// .unwrap();
    /// assert_eq!(d.get_str("request.method"), "GET");
    /// ```
    pub fn from_json(attributes: Value) -> Result<Self, StateError> {
        match attributes {
            Value::Object(map) => Ok(Self {
                id: String::new(),
                attributes: map.into_iter().collect(),
            }),
            _ => Err(StateError::NotAnObject),
        }
    }

    /// Creates empty state keyed by an existing ID, as an import does.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Returns the resource ID, empty when the resource is absent.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sets the resource ID. An empty ID marks the resource as absent.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Returns `true` when an ID is assigned.
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }

    /// Returns all top-level attributes.
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Returns the attributes as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<_, _>>(),
        )
    }

    /// Looks up a value by dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.attributes.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Looks up a value by dotted path, treating zero values as unset.
    ///
    /// Empty strings, `0`, `false`, `null` and empty lists or maps all count as
    /// unset.
    pub fn get_ok(&self, path: &str) -> Option<&Value> {
        self.get(path).filter(|v| !is_zero(v))
    }

    /// Returns a value in its local string encoding, or `""` when unset.
    pub fn get_str(&self, path: &str) -> String {
        self.get(path).and_then(local_string).unwrap_or_default()
    }

    /// Returns a set value in its local string encoding.
    pub fn get_ok_str(&self, path: &str) -> Option<String> {
        self.get_ok(path).and_then(local_string)
    }

    /// Returns the elements of a list attribute, or an empty slice.
    pub fn get_list(&self, path: &str) -> &[Value] {
        match self.get(path) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Returns a map attribute with every value in its local string encoding.
    pub fn get_string_map(&self, path: &str) -> BTreeMap<String, String> {
        match self.get(path) {
            Some(Value::Object(map)) => string_map(map),
            _ => BTreeMap::new(),
        }
    }

    /// Returns a boolean attribute if it is present at all, including `false`.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        match self.get(path)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => parse_local_bool(s),
            _ => None,
        }
    }

    /// Sets a top-level attribute.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// Removes a top-level attribute.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }
}

/// Returns `true` for a value the framework would consider unset.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Converts a scalar to its local string encoding.
pub fn local_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Converts every scalar of a JSON object to its local string encoding.
pub fn string_map(map: &Map<String, Value>) -> BTreeMap<String, String> {
    map.iter()
        .filter_map(|(k, v)| local_string(v).map(|s| (k.clone(), s)))
        .collect()
}

/// Parses a boolean stored as a string. Accepts `true`/`false` and `1`/`0`.
pub fn parse_local_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
