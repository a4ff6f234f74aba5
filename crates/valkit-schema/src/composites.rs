//! Structural nodes that recurse into children: object, array, tuple and
//! record.

use crate::node::{IntoSchemaRef, Schema, SchemaBase, SchemaRef};
use crate::primitives::validate_present;
use crate::result::{prefix_errors, ValidationResult};
use crate::value::Value;

pub const MISSING_PROPERTY_MESSAGE: &str = "Property is missing.";

/// Fixed set of named properties. Keys not declared here are ignored.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    base: SchemaBase,
    properties: Vec<(String, SchemaRef)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or replace) a property.
    pub fn property(mut self, name: impl Into<String>, schema: impl IntoSchemaRef) -> Self {
        let name = name.into();
        let schema = schema.into_schema_ref();
        match self.properties.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = schema,
            None => self.properties.push((name, schema)),
        }
        self
    }

    pub fn properties(&self) -> &[(String, SchemaRef)] {
        &self.properties
    }
}

impl Schema for ObjectSchema {
    schema_base!("object");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |value, errors| {
            if value.as_object().is_none() {
                errors.push("Value must be an object.".to_string());
                return;
            }
            for (name, child) in &self.properties {
                let prefix = format!("Validation failed for property '{name}': ");
                let field = value.get(name);
                if field.is_undefined() {
                    if child.is_required() {
                        errors.push(format!("{prefix}{MISSING_PROPERTY_MESSAGE}"));
                    }
                    continue;
                }
                let result = child.validate(field);
                errors.extend(prefix_errors(&prefix, result.errors));
            }
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArraySchema {
    base: SchemaBase,
    items: Option<SchemaRef>,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl ArraySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Array whose every item must satisfy `items`.
    pub fn of(items: impl IntoSchemaRef) -> Self {
        Self::new().items(items)
    }

    pub fn items(mut self, items: impl IntoSchemaRef) -> Self {
        self.items = Some(items.into_schema_ref());
        self
    }

    pub fn min(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }
}

impl Schema for ArraySchema {
    schema_base!("array");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |value, errors| {
            let Some(items) = value.as_array() else {
                errors.push("Value must be an array.".to_string());
                return;
            };
            if let Some(min) = self.min_length {
                if items.len() < min {
                    errors.push(format!("Array is too short. Minimum length is {min}."));
                }
            }
            if let Some(max) = self.max_length {
                if items.len() > max {
                    errors.push(format!("Array is too long. Maximum length is {max}."));
                }
            }
            if let Some(schema) = &self.items {
                for (index, item) in items.iter().enumerate() {
                    let result = schema.validate(item);
                    errors.extend(prefix_errors(&format!("Error at index {index}: "), result.errors));
                }
            }
        })
    }
}

/// Fixed-length array with one schema per position.
#[derive(Debug, Clone)]
pub struct TupleSchema {
    base: SchemaBase,
    elements: Vec<SchemaRef>,
}

impl TupleSchema {
    pub fn new<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoSchemaRef,
    {
        Self {
            base: SchemaBase::default(),
            elements: elements.into_iter().map(IntoSchemaRef::into_schema_ref).collect(),
        }
    }
}

impl Schema for TupleSchema {
    schema_base!("tuple");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |value, errors| {
            let Some(items) = value.as_array() else {
                errors.push("Value must be an array.".to_string());
                return;
            };
            if items.len() != self.elements.len() {
                errors.push(format!(
                    "Tuple must have exactly {} elements.",
                    self.elements.len()
                ));
                return;
            }
            for (index, (schema, item)) in self.elements.iter().zip(items).enumerate() {
                let result = schema.validate(item);
                errors.extend(prefix_errors(&format!("Error at index {index}: "), result.errors));
            }
        })
    }
}

/// Homogeneous map: every key checked against one schema, every value
/// against another.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    base: SchemaBase,
    key_schema: SchemaRef,
    value_schema: SchemaRef,
}

impl RecordSchema {
    pub fn new(key_schema: impl IntoSchemaRef, value_schema: impl IntoSchemaRef) -> Self {
        Self {
            base: SchemaBase::default(),
            key_schema: key_schema.into_schema_ref(),
            value_schema: value_schema.into_schema_ref(),
        }
    }
}

impl Schema for RecordSchema {
    schema_base!("record");

    fn validate(&self, value: &Value) -> ValidationResult {
        validate_present(&self.base, value, |value, errors| {
            let Some(entries) = value.as_object() else {
                errors.push("Value must be an object.".to_string());
                return;
            };
            for (key, entry) in entries {
                let key_result = self.key_schema.validate(&Value::String(key.clone()));
                errors.extend(prefix_errors(&format!("Invalid key '{key}': "), key_result.errors));

                let value_result = self.value_schema.validate(entry);
                errors.extend(prefix_errors(
                    &format!("Invalid value for key '{key}': "),
                    value_result.errors,
                ));
            }
        })
    }
}
