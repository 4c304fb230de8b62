//! Static declaration of the `datadog_synthetics_test` configuration.
//!
//! The provider framework consumes this description to validate and diff
//! user configuration. [`ResourceSchema::validate`] performs the same checks
//! locally: required attributes, value types and the `type` validator.

use serde_json::Value;
use thiserror::Error;

use crate::state::ResourceData;
use crate::types::SYNTHETICS_TYPES;

/// Name under which the resource is registered.
pub const RESOURCE_NAME: &str = "datadog_synthetics_test";

/// Element type of a list attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemType {
    /// List of strings.
    String,
    /// List of string maps.
    Map,
}

/// Type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Int,
    Bool,
    List(ElemType),
    /// String-valued map, optionally with declared keys.
    Map,
}

impl AttributeType {
    fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "integer",
            Self::Bool => "bool",
            Self::List(ElemType::String) => "list of strings",
            Self::List(ElemType::Map) => "list of maps",
            Self::Map => "map",
        }
    }
}

/// Schema validation failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A required attribute is missing or empty.
    #[error("{0}: required field is not set")]
    MissingRequired(String),

    /// A value is outside the allowed set.
    #[error("{path}: expected one of [{allowed}], got {value:?}")]
    InvalidValue {
        path: String,
        value: String,
        allowed: String,
    },

    /// A value has the wrong type.
    #[error("{path}: expected {expected}")]
    WrongType { path: String, expected: &'static str },
}

/// Declaration of one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: &'static str,
    pub typ: AttributeType,
    pub required: bool,
    pub default: Option<Value>,
    pub allowed_values: Option<&'static [&'static str]>,
    /// Declared keys of a map attribute.
    pub fields: Vec<Attribute>,
}

impl Attribute {
    /// Declares a required attribute.
    pub fn required(name: &'static str, typ: AttributeType) -> Self {
        Self {
            name,
            typ,
            required: true,
            default: None,
            allowed_values: None,
            fields: Vec::new(),
        }
    }

    /// Declares an optional attribute.
    pub fn optional(name: &'static str, typ: AttributeType) -> Self {
        Self {
            required: false,
            ..Self::required(name, typ)
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restricts a string attribute to a fixed set of values.
    pub fn with_allowed_values(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed_values = Some(allowed);
        self
    }

    pub fn with_fields(mut self, fields: Vec<Attribute>) -> Self {
        self.fields = fields;
        self
    }

    fn check(&self, path: &str, value: &Value, errors: &mut Vec<SchemaError>) {
        let type_ok = match self.typ {
            AttributeType::String => value.is_string(),
            AttributeType::Int => match value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                Value::String(s) => s.trim().parse::<i64>().is_ok(),
                _ => false,
            },
            AttributeType::Bool => value.is_boolean(),
            AttributeType::List(ElemType::String) => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            AttributeType::List(ElemType::Map) => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
            AttributeType::Map => value.is_object(),
        };
        if !type_ok {
            errors.push(SchemaError::WrongType {
                path: path.to_string(),
                expected: self.typ.describe(),
            });
            return;
        }

        if let (Some(allowed), Some(s)) = (self.allowed_values, value.as_str()) {
            if !allowed.contains(&s) {
                errors.push(SchemaError::InvalidValue {
                    path: path.to_string(),
                    value: s.to_string(),
                    allowed: allowed.join(", "),
                });
            }
        }

        if let Value::Object(map) = value {
            for field in &self.fields {
                let field_path = format!("{}.{}", path, field.name);
                match map.get(field.name).filter(|v| !crate::state::is_zero(v)) {
                    Some(v) => field.check(&field_path, v, errors),
                    None if field.required => {
                        errors.push(SchemaError::MissingRequired(field_path))
                    }
                    None => {}
                }
            }
        }
    }
}

/// Declaration of a whole resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSchema {
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    /// Returns the declaration of a top-level attribute.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Checks local state against the declaration.
    ///
    /// Unknown attributes are ignored. Every failure is reported, not just the
    /// first.
    pub fn validate(&self, d: &ResourceData) -> Result<(), Vec<SchemaError>> {
        let mut errors = Vec::new();
        for attribute in &self.attributes {
            match d.get(attribute.name) {
                Some(v) if !crate::state::is_zero(v) || v.is_boolean() => {
                    attribute.check(attribute.name, v, &mut errors)
                }
                _ if attribute.required => {
                    errors.push(SchemaError::MissingRequired(attribute.name.to_string()))
                }
                _ => {}
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Fills in declared defaults for absent top-level attributes.
    pub fn apply_defaults(&self, d: &mut ResourceData) {
        for attribute in &self.attributes {
            if let Some(default) = &attribute.default {
                if d.get(attribute.name).is_none() {
                    d.set(attribute.name, default.clone());
                }
            }
        }
    }
}

/// Builds the schema of the synthetics test resource.
pub fn synthetics_test_schema() -> ResourceSchema {
    ResourceSchema {
        attributes: vec![
            Attribute::required("name", AttributeType::String),
            Attribute::required("type", AttributeType::String)
                .with_allowed_values(SYNTHETICS_TYPES),
            Attribute::optional("message", AttributeType::String).with_default(""),
            request_schema(),
            Attribute::optional("request_headers", AttributeType::Map),
            Attribute::optional("assertions", AttributeType::List(ElemType::Map)),
            Attribute::optional("devices", AttributeType::List(ElemType::Map)),
            Attribute::required("locations", AttributeType::List(ElemType::String)),
            options_schema(),
            Attribute::optional("tags", AttributeType::List(ElemType::String)),
            Attribute::optional("paused", AttributeType::Bool),
        ],
    }
}

fn request_schema() -> Attribute {
    Attribute::required("request", AttributeType::Map).with_fields(vec![
        Attribute::required("method", AttributeType::String),
        Attribute::required("url", AttributeType::String),
        Attribute::optional("body", AttributeType::String),
        Attribute::optional("timeout", AttributeType::Int).with_default(0),
    ])
}

fn options_schema() -> Attribute {
    Attribute::optional("options", AttributeType::Map).with_fields(vec![
        Attribute::required("tick_every", AttributeType::Int),
        Attribute::optional("min_failure_duration", AttributeType::Int),
        Attribute::optional("min_location_failed", AttributeType::Int),
    ])
}
