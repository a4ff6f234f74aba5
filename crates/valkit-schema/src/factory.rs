//! One constructor per node kind. This is the entry point for building a
//! schema by hand:
//!
//! ```
//! use valkit_schema::{factory as s, Schema, SchemaExt, Value};
//!
//! let user = s::object()
//!     .property("name", s::string().min(1))
//!     .property("age", s::number().integer().optional());
//! assert!(user.validate(&Value::from(serde_json::json!({ "name": "Ann" }))).is_valid);
//! ```

use crate::composites::{ArraySchema, ObjectSchema, RecordSchema, TupleSchema};
use crate::modifiers::{LazySchema, NullableSchema, OptionalSchema, TransformSchema};
use crate::node::{IntoSchemaRef, SchemaRef};
use crate::primitives::{
    AnySchema, BooleanSchema, DateSchema, EnumSchema, LiteralSchema, NumberSchema, StringSchema,
};
use crate::union::UnionSchema;
use crate::value::Value;

pub fn string() -> StringSchema {
    StringSchema::new()
}

pub fn number() -> NumberSchema {
    NumberSchema::new()
}

pub fn boolean() -> BooleanSchema {
    BooleanSchema::new()
}

pub fn date() -> DateSchema {
    DateSchema::new()
}

pub fn any() -> AnySchema {
    AnySchema::new()
}

/// `enum` is reserved, hence the name.
pub fn one_of<I, V>(allowed: I) -> EnumSchema
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    EnumSchema::new(allowed)
}

pub fn literal(value: impl Into<Value>) -> LiteralSchema {
    LiteralSchema::new(value)
}

pub fn object() -> ObjectSchema {
    ObjectSchema::new()
}

pub fn array(items: impl IntoSchemaRef) -> ArraySchema {
    ArraySchema::of(items)
}

pub fn tuple<I, S>(elements: I) -> TupleSchema
where
    I: IntoIterator<Item = S>,
    S: IntoSchemaRef,
{
    TupleSchema::new(elements)
}

pub fn record(key: impl IntoSchemaRef, value: impl IntoSchemaRef) -> RecordSchema {
    RecordSchema::new(key, value)
}

pub fn union<I, S>(options: I) -> UnionSchema
where
    I: IntoIterator<Item = S>,
    S: IntoSchemaRef,
{
    UnionSchema::new(options)
}

pub fn nullable(inner: impl IntoSchemaRef) -> NullableSchema {
    NullableSchema::new(inner)
}

pub fn optional(inner: impl IntoSchemaRef) -> OptionalSchema {
    OptionalSchema::new(inner)
}

pub fn transform<F>(inner: impl IntoSchemaRef, map: F) -> TransformSchema
where
    F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
{
    TransformSchema::new(inner, map)
}

pub fn lazy<F>(factory: F) -> LazySchema
where
    F: Fn() -> SchemaRef + Send + Sync + 'static,
{
    LazySchema::new(factory)
}
