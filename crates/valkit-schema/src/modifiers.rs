//! Single-child wrappers: nullable, optional, transform and lazy.

use std::fmt;
use std::sync::Arc;

use crate::node::{IntoSchemaRef, Schema, SchemaBase, SchemaRef};
use crate::result::{prefix_errors, ValidationResult};
use crate::transform::TransformFn;
use crate::value::Value;

pub const NULL_OR_UNDEFINED_MESSAGE: &str = "Value cannot be null or undefined.";

/// Builds the child of a [`LazySchema`] on demand.
pub type SchemaFactory = Arc<dyn Fn() -> SchemaRef + Send + Sync>;

/// Accepts null and undefined outright; anything else goes to the inner
/// node. The inner node's own presence flags are never consulted.
#[derive(Debug, Clone)]
pub struct NullableSchema {
    base: SchemaBase,
    inner: SchemaRef,
}

impl NullableSchema {
    pub fn new(inner: impl IntoSchemaRef) -> Self {
        let mut base = SchemaBase::default();
        base.set_nullable(true);
        base.set_required(false);
        Self {
            base,
            inner: inner.into_schema_ref(),
        }
    }
}

impl Schema for NullableSchema {
    schema_base!("nullable");

    fn validate(&self, value: &Value) -> ValidationResult {
        if value.is_absent() {
            return ValidationResult::valid();
        }
        delegate(&self.base, &*self.inner, value)
    }
}

/// Accepts undefined outright; null and everything else goes to the inner
/// node.
#[derive(Debug, Clone)]
pub struct OptionalSchema {
    base: SchemaBase,
    inner: SchemaRef,
}

impl OptionalSchema {
    pub fn new(inner: impl IntoSchemaRef) -> Self {
        let mut base = SchemaBase::default();
        base.set_required(false);
        Self {
            base,
            inner: inner.into_schema_ref(),
        }
    }
}

impl Schema for OptionalSchema {
    schema_base!("optional");

    fn validate(&self, value: &Value) -> ValidationResult {
        if value.is_undefined() {
            return ValidationResult::valid();
        }
        delegate(&self.base, &*self.inner, value)
    }
}

fn delegate(base: &SchemaBase, inner: &dyn Schema, value: &Value) -> ValidationResult {
    let mut errors = base.custom_errors(value);
    let result = inner.validate(value);
    if errors.is_empty() {
        return result;
    }
    errors.extend(result.errors);
    ValidationResult::from_errors(errors)
}

/// Maps the value first, then validates the mapped value against the inner
/// node. The mapped value is returned in [`ValidationResult::value`] whether
/// or not it passed.
#[derive(Clone)]
pub struct TransformSchema {
    base: SchemaBase,
    inner: SchemaRef,
    transform: TransformFn,
}

impl TransformSchema {
    pub fn new<F>(inner: impl IntoSchemaRef, transform: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::from_fn(inner, Arc::new(transform))
    }

    pub fn from_fn(inner: impl IntoSchemaRef, transform: TransformFn) -> Self {
        Self {
            base: SchemaBase::default(),
            inner: inner.into_schema_ref(),
            transform,
        }
    }
}

impl fmt::Debug for TransformSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformSchema")
            .field("base", &self.base)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl Schema for TransformSchema {
    schema_base!("transform");

    fn validate(&self, value: &Value) -> ValidationResult {
        let passes_through = match value {
            Value::Undefined => !self.base.is_required(),
            Value::Null => self.base.is_nullable(),
            _ => false,
        };
        if passes_through {
            return ValidationResult::valid().with_value(value.clone());
        }

        let mapped = match (self.transform)(value) {
            Ok(mapped) => mapped,
            Err(reason) => {
                return ValidationResult::from_errors(vec![format!("Transform failed: {reason}")])
            }
        };

        let mut errors = if mapped.is_absent() {
            Vec::new()
        } else {
            self.base.custom_errors(&mapped)
        };
        errors.extend(self.inner.validate(&mapped).errors);
        ValidationResult::from_errors(errors).with_value(mapped)
    }
}

/// Defers building its child until validation, so a schema can refer to
/// itself.
///
/// With a property name set, a value that passes is then checked again by
/// this same node at `value[property_name]`, one level at a time, until that
/// property is absent or null. This follows a single named edge only; it is
/// not general recursive-schema support.
#[derive(Clone)]
pub struct LazySchema {
    base: SchemaBase,
    factory: SchemaFactory,
    property_name: Option<String>,
}

impl LazySchema {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> SchemaRef + Send + Sync + 'static,
    {
        Self {
            base: SchemaBase::default(),
            factory: Arc::new(factory),
            property_name: None,
        }
    }

    pub fn property_name(mut self, name: impl Into<String>) -> Self {
        self.property_name = Some(name.into());
        self
    }
}

impl fmt::Debug for LazySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySchema")
            .field("base", &self.base)
            .field("property_name", &self.property_name)
            .finish_non_exhaustive()
    }
}

impl Schema for LazySchema {
    schema_base!("lazy");

    fn validate(&self, value: &Value) -> ValidationResult {
        if value.is_absent() {
            if self.base.is_nullable() {
                return ValidationResult::valid();
            }
            let message = self
                .base
                .custom_message()
                .unwrap_or(NULL_OR_UNDEFINED_MESSAGE);
            return ValidationResult::from_errors(vec![message.to_string()]);
        }

        let mut errors = self.base.custom_errors(value);
        let schema = (self.factory)();
        errors.extend(schema.validate(value).errors);

        if errors.is_empty() {
            if let Some(name) = &self.property_name {
                let next = value.get(name);
                if !next.is_absent() {
                    let nested = self.validate(next);
                    errors.extend(prefix_errors(
                        &format!("Validation failed for property '{name}': "),
                        nested.errors,
                    ));
                }
            }
        }
        ValidationResult::from_errors(errors)
    }
}
