//! Composable schema validators and a declarative schema compiler.
//!
//! Build a validator tree by hand with [`factory`], or describe it in a
//! JSON/YAML document and compile it with [`SchemaFileProvider`]. Either way
//! `validate` is a plain tree walk that returns a [`ValidationResult`]; it
//! never fails for a bad value.

/// Implements the `base`, `base_mut` and `kind` accessors of [`Schema`] for
/// a node with a `base: SchemaBase` field.
macro_rules! schema_base {
    ($kind:literal) => {
        fn base(&self) -> &$crate::node::SchemaBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut $crate::node::SchemaBase {
            &mut self.base
        }

        fn kind(&self) -> &'static str {
            $kind
        }
    };
}

pub mod compile;
pub mod composites;
pub mod config;
pub mod error;
pub mod factory;
pub mod modifiers;
pub mod node;
pub mod primitives;
pub mod provider;
pub mod result;
pub mod transform;
pub mod union;
pub mod value;

pub use compile::convert_to_schema;
pub use composites::{ArraySchema, ObjectSchema, RecordSchema, TupleSchema};
pub use config::{DocumentFormat, ProviderConfig, SCHEMA_PATH_ENV, SUPPORTED_EXTENSIONS};
pub use error::{Result, SchemaError};
pub use modifiers::{LazySchema, NullableSchema, OptionalSchema, TransformSchema};
pub use node::{IntoSchemaRef, Schema, SchemaBase, SchemaExt, SchemaRef};
pub use primitives::{
    AnySchema, BooleanSchema, DateSchema, EnumSchema, LiteralSchema, NumberSchema, StringSchema,
};
pub use provider::{read_document, SchemaFileProvider};
pub use result::ValidationResult;
pub use transform::{TransformFn, TransformRegistry};
pub use union::UnionSchema;
pub use value::Value;
