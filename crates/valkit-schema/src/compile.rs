//! Turns `type`-tagged declarative definitions into live schema nodes.
//!
//! A definition is a JSON value (YAML documents are parsed into the same
//! shape) such as:
//!
//! ```yaml
//! type: object
//! required: [name]
//! properties:
//!   name: { type: string, minLength: 1 }
//!   tags: { type: array, items: { type: string } }
//! ```
//!
//! Presence is resolved at compile time. A node is required only if its
//! definition says `required: true`, and inside an object whose definition
//! carries a `required` list, that list decides for every property and
//! overrides the property's own flag.

use std::sync::Arc;

use serde_json::{Map, Value as Json};
use tracing::trace;

use crate::composites::{ArraySchema, ObjectSchema, RecordSchema, TupleSchema};
use crate::error::{Result, SchemaError};
use crate::modifiers::{LazySchema, NullableSchema, OptionalSchema, TransformSchema};
use crate::node::{Schema, SchemaRef};
use crate::primitives::{
    AnySchema, BooleanSchema, DateSchema, EnumSchema, LiteralSchema, NumberSchema, StringSchema,
};
use crate::transform::{parse_date, TransformRegistry};
use crate::union::UnionSchema;
use crate::value::Value;

/// Compile a single definition. `path` names it in error messages.
pub fn convert_to_schema(
    definition: &Json,
    transforms: &TransformRegistry,
    path: &str,
) -> Result<SchemaRef> {
    Compiler { transforms }
        .convert(definition, path)
        .map(Arc::from)
}

struct Compiler<'a> {
    transforms: &'a TransformRegistry,
}

impl Compiler<'_> {
    fn convert(&self, definition: &Json, path: &str) -> Result<Box<dyn Schema>> {
        let def = Definition::new(definition, path)?;
        let tag = def.str_field("type")?.ok_or_else(|| def.invalid("missing 'type'"))?;
        trace!(path, tag, "compiling definition");

        let mut node: Box<dyn Schema> = match tag {
            "string" => {
                let mut schema = StringSchema::new();
                if let Some(min) = def.usize_field("minLength")? {
                    schema = schema.min(min);
                }
                if let Some(max) = def.usize_field("maxLength")? {
                    schema = schema.max(max);
                }
                Box::new(schema)
            }
            "number" => {
                let mut schema = NumberSchema::new();
                if let Some(min) = def.f64_field("min")? {
                    schema = schema.min(min);
                }
                if let Some(max) = def.f64_field("max")? {
                    schema = schema.max(max);
                }
                if def.bool_field("integer")?.unwrap_or(false) {
                    schema = schema.integer();
                }
                Box::new(schema)
            }
            "boolean" => Box::new(BooleanSchema::new()),
            "date" => {
                let mut schema = DateSchema::new().accept_strings();
                if let Some(min) = def.date_field("min")? {
                    schema = schema.min(min);
                }
                if let Some(max) = def.date_field("max")? {
                    schema = schema.max(max);
                }
                Box::new(schema)
            }
            "any" => Box::new(AnySchema::new()),
            "enum" => {
                let allowed = def
                    .array_field("allowedValues")?
                    .ok_or_else(|| def.invalid("missing 'allowedValues'"))?;
                Box::new(EnumSchema::new(allowed.iter().map(Value::from)))
            }
            "literal" => {
                let literal = def
                    .raw("value")
                    .ok_or_else(|| def.invalid("missing 'value'"))?;
                Box::new(LiteralSchema::new(Value::from(literal)))
            }
            "object" => Box::new(self.object(&def)?),
            "array" => {
                let mut schema = ArraySchema::new();
                if let Some(items) = def.raw("items") {
                    schema = schema.items(self.child(items, &def.child_path("items"))?);
                }
                if let Some(min) = def.usize_field("minLength")? {
                    schema = schema.min(min);
                }
                if let Some(max) = def.usize_field("maxLength")? {
                    schema = schema.max(max);
                }
                Box::new(schema)
            }
            "tuple" => Box::new(TupleSchema::new(self.children(&def, "schemas")?)),
            "union" => Box::new(UnionSchema::new(self.children(&def, "schemas")?)),
            "record" => {
                let key = self.required_child(&def, "keySchema")?;
                let value = self.required_child(&def, "valueSchema")?;
                Box::new(RecordSchema::new(key, value))
            }
            "nullable" => Box::new(NullableSchema::new(self.required_child(&def, "schema")?)),
            "optional" => Box::new(OptionalSchema::new(self.required_child(&def, "schema")?)),
            "transform" => {
                let inner = self.required_child(&def, "schema")?;
                let name = def
                    .str_field("transformFn")?
                    .ok_or_else(|| def.invalid("missing 'transformFn'"))?;
                let transform = self.transforms.get(name).ok_or_else(|| {
                    SchemaError::UnknownTransform {
                        name: name.to_string(),
                        path: path.to_string(),
                    }
                })?;
                Box::new(TransformSchema::from_fn(inner, transform))
            }
            "lazy" => {
                let inner = self.required_child(&def, "schema")?;
                let mut schema = LazySchema::new(move || inner.clone());
                if let Some(name) = def.str_field("propertyName")? {
                    schema = schema.property_name(name);
                }
                Box::new(schema)
            }
            other => {
                return Err(SchemaError::UnsupportedType {
                    tag: other.to_string(),
                    path: path.to_string(),
                })
            }
        };

        let base = node.base_mut();
        if let Some(nullable) = def.bool_field("nullable")? {
            base.set_nullable(nullable);
        }
        // Object definitions use `required` for their property list.
        match def.raw("required") {
            Some(Json::Bool(required)) => base.set_required(*required),
            Some(Json::Array(_)) if tag == "object" => base.set_required(false),
            None => base.set_required(false),
            Some(_) => return Err(def.invalid("'required' must be a boolean")),
        }
        if let Some(message) = def.str_field("message")? {
            base.set_message(message);
        }
        Ok(node)
    }

    fn object(&self, def: &Definition<'_>) -> Result<ObjectSchema> {
        let required: Option<Vec<&str>> = match def.raw("required") {
            Some(Json::Array(names)) => Some(
                names
                    .iter()
                    .map(|name| {
                        name.as_str()
                            .ok_or_else(|| def.invalid("'required' entries must be strings"))
                    })
                    .collect::<Result<_>>()?,
            ),
            _ => None,
        };

        let mut schema = ObjectSchema::new();
        let Some(properties) = def.raw("properties") else {
            return Ok(schema);
        };
        let properties = properties
            .as_object()
            .ok_or_else(|| def.invalid("'properties' must be a mapping"))?;

        for (name, child) in properties {
            let mut node = self.convert(child, &def.child_path(&format!("properties.{name}")))?;
            if let Some(required) = &required {
                node.base_mut().set_required(required.contains(&name.as_str()));
            }
            schema = schema.property(name.clone(), SchemaRef::from(node));
        }
        Ok(schema)
    }

    fn child(&self, definition: &Json, path: &str) -> Result<SchemaRef> {
        self.convert(definition, path).map(Arc::from)
    }

    fn required_child(&self, def: &Definition<'_>, field: &str) -> Result<SchemaRef> {
        let child = def
            .raw(field)
            .ok_or_else(|| def.invalid(&format!("missing '{field}'")))?;
        self.child(child, &def.child_path(field))
    }

    fn children(&self, def: &Definition<'_>, field: &str) -> Result<Vec<SchemaRef>> {
        let items = def
            .array_field(field)?
            .ok_or_else(|| def.invalid(&format!("missing '{field}'")))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.child(item, &def.child_path(&format!("{field}[{index}]"))))
            .collect()
    }
}

/// Typed field access over one definition object.
struct Definition<'a> {
    fields: &'a Map<String, Json>,
    path: &'a str,
}

impl<'a> Definition<'a> {
    fn new(definition: &'a Json, path: &'a str) -> Result<Self> {
        let fields = definition.as_object().ok_or_else(|| SchemaError::InvalidDefinition {
            path: path.to_string(),
            message: "definition must be a mapping".to_string(),
        })?;
        Ok(Self { fields, path })
    }

    fn invalid(&self, message: &str) -> SchemaError {
        SchemaError::InvalidDefinition {
            path: self.path.to_string(),
            message: message.to_string(),
        }
    }

    fn child_path(&self, segment: &str) -> String {
        format!("{}.{segment}", self.path)
    }

    fn raw(&self, field: &str) -> Option<&'a Json> {
        self.fields.get(field)
    }

    fn typed<T>(
        &self,
        field: &str,
        kind: &str,
        read: impl Fn(&'a Json) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.raw(field) {
            None => Ok(None),
            Some(value) => read(value)
                .map(Some)
                .ok_or_else(|| self.invalid(&format!("'{field}' must be {kind}"))),
        }
    }

    fn str_field(&self, field: &str) -> Result<Option<&'a str>> {
        self.typed(field, "a string", Json::as_str)
    }

    fn bool_field(&self, field: &str) -> Result<Option<bool>> {
        self.typed(field, "a boolean", Json::as_bool)
    }

    fn f64_field(&self, field: &str) -> Result<Option<f64>> {
        self.typed(field, "a number", Json::as_f64)
    }

    fn usize_field(&self, field: &str) -> Result<Option<usize>> {
        self.typed(field, "a non-negative integer", |value| {
            value.as_u64().and_then(|n| usize::try_from(n).ok())
        })
    }

    fn array_field(&self, field: &str) -> Result<Option<&'a Vec<Json>>> {
        self.typed(field, "a list", Json::as_array)
    }

    fn date_field(&self, field: &str) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
        self.typed(field, "an RFC 3339 date", |value| value.as_str().and_then(parse_date))
    }
}
