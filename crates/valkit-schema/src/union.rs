use crate::node::{IntoSchemaRef, Precheck, Schema, SchemaBase, SchemaRef};
use crate::result::ValidationResult;
use crate::value::Value;

pub const NO_MATCH_MESSAGE: &str = "Value does not match any of the allowed types.";

/// Tries each option in order and accepts on the first match.
///
/// A null or undefined value that the union's own flags reject is still
/// offered to the options, so a nullable or optional option can accept it.
/// The union's presence error is reported only if none does. When nothing
/// matches a present value, the errors are the generic no-match message
/// followed by every option's own errors, in option order.
#[derive(Debug, Clone)]
pub struct UnionSchema {
    base: SchemaBase,
    options: Vec<SchemaRef>,
}

impl UnionSchema {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoSchemaRef,
    {
        Self {
            base: SchemaBase::default(),
            options: options.into_iter().map(IntoSchemaRef::into_schema_ref).collect(),
        }
    }
}

impl Schema for UnionSchema {
    schema_base!("union");

    fn validate(&self, value: &Value) -> ValidationResult {
        let custom = match self.base.precheck(value) {
            Precheck::Absent(result) if result.is_valid => return result,
            Precheck::Absent(rejected) => {
                return self
                    .options
                    .iter()
                    .map(|option| option.validate(value))
                    .find(|result| result.is_valid)
                    .unwrap_or(rejected);
            }
            Precheck::Present(custom) => custom,
        };

        let mut option_errors = Vec::new();
        for option in &self.options {
            let result = option.validate(value);
            if result.is_valid {
                return if custom.is_empty() {
                    result
                } else {
                    ValidationResult::from_errors(custom)
                };
            }
            option_errors.extend(result.errors);
        }

        let mut errors = custom;
        errors.push(NO_MATCH_MESSAGE.to_string());
        errors.extend(option_errors);
        ValidationResult::from_errors(errors)
    }
}
