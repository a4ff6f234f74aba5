//! Shared node state and the traits every schema node implements.

use std::fmt;
use std::sync::Arc;

use crate::result::ValidationResult;
use crate::value::Value;

/// Predicate used by [`SchemaExt::add_validation`].
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A frozen, shareable schema node.
pub type SchemaRef = Arc<dyn Schema>;

pub const NULL_MESSAGE: &str = "Value cannot be null.";
pub const REQUIRED_MESSAGE: &str = "Value is required.";

#[derive(Clone)]
pub(crate) struct CustomValidation {
    predicate: Predicate,
    message: String,
}

/// Required/nullable flags, custom message and custom validations carried
/// by every node.
#[derive(Clone)]
pub struct SchemaBase {
    pub(crate) nullable: bool,
    pub(crate) required: bool,
    pub(crate) message: Option<String>,
    pub(crate) validations: Vec<CustomValidation>,
}

impl Default for SchemaBase {
    fn default() -> Self {
        Self {
            nullable: false,
            required: true,
            message: None,
            validations: Vec::new(),
        }
    }
}

impl fmt::Debug for SchemaBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBase")
            .field("nullable", &self.nullable)
            .field("required", &self.required)
            .field("message", &self.message)
            .field("validations", &self.validations.len())
            .finish()
    }
}

/// Result of the shared presence check.
pub(crate) enum Precheck {
    /// The value is null or undefined; nothing else should run.
    Absent(ValidationResult),
    /// The value is present. Carries the custom-validation failures; the
    /// node appends its own type errors after these.
    Present(Vec<String>),
}

impl SchemaBase {
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn custom_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn push_validation(&mut self, predicate: Predicate, message: impl Into<String>) {
        self.validations.push(CustomValidation {
            predicate,
            message: message.into(),
        });
    }

    /// Presence check run before any type-specific logic.
    ///
    /// Null and undefined never reach custom validations or type checks.
    pub(crate) fn precheck(&self, value: &Value) -> Precheck {
        match value {
            Value::Undefined if !self.required => Precheck::Absent(ValidationResult::valid()),
            Value::Undefined => Precheck::Absent(self.fail_with(REQUIRED_MESSAGE)),
            Value::Null if self.nullable => Precheck::Absent(ValidationResult::valid()),
            Value::Null => Precheck::Absent(self.fail_with(NULL_MESSAGE)),
            present => Precheck::Present(self.custom_errors(present)),
        }
    }

    /// Messages of every custom validation that rejects `value`.
    pub(crate) fn custom_errors(&self, value: &Value) -> Vec<String> {
        self.validations
            .iter()
            .filter(|check| !(check.predicate)(value))
            .map(|check| check.message.clone())
            .collect()
    }

    fn fail_with(&self, default_message: &str) -> ValidationResult {
        let message = self.message.as_deref().unwrap_or(default_message);
        ValidationResult::from_errors(vec![message.to_string()])
    }
}

/// A node in the validator tree.
///
/// `validate` never fails: every problem with the value is reported through
/// [`ValidationResult::errors`].
pub trait Schema: Send + Sync {
    fn validate(&self, value: &Value) -> ValidationResult;

    fn base(&self) -> &SchemaBase;

    fn base_mut(&mut self) -> &mut SchemaBase;

    /// Node kind, matching the declarative `type` tag.
    fn kind(&self) -> &'static str;

    fn is_required(&self) -> bool {
        self.base().is_required()
    }

    fn is_nullable(&self) -> bool {
        self.base().is_nullable()
    }
}

impl fmt::Debug for dyn Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.kind())
            .field("base", self.base())
            .finish()
    }
}

/// Consuming fluent configuration for any concrete node.
///
/// Setters take the node by value, so configuration ends once the node is
/// frozen with [`SchemaExt::shared`].
pub trait SchemaExt: Schema + Sized + 'static {
    fn nullable(mut self, nullable: bool) -> Self {
        self.base_mut().set_nullable(nullable);
        self
    }

    fn optional(self) -> Self {
        self.required(false)
    }

    fn required(mut self, required: bool) -> Self {
        self.base_mut().set_required(required);
        self
    }

    /// Replace the default null/required messages.
    fn message(mut self, message: impl Into<String>) -> Self {
        self.base_mut().set_message(message);
        self
    }

    fn add_validation<F>(mut self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.base_mut().push_validation(Arc::new(predicate), message);
        self
    }

    fn shared(self) -> SchemaRef {
        Arc::new(self)
    }
}

impl<T: Schema + Sized + 'static> SchemaExt for T {}

/// Anything that can be stored as a child node.
pub trait IntoSchemaRef {
    fn into_schema_ref(self) -> SchemaRef;
}

impl IntoSchemaRef for SchemaRef {
    fn into_schema_ref(self) -> SchemaRef {
        self
    }
}

impl<T: Schema + 'static> IntoSchemaRef for T {
    fn into_schema_ref(self) -> SchemaRef {
        Arc::new(self)
    }
}

impl IntoSchemaRef for Box<dyn Schema> {
    fn into_schema_ref(self) -> SchemaRef {
        Arc::from(self)
    }
}
