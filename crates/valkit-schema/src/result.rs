use serde::Serialize;

use crate::value::Value;

/// Outcome of a single `validate` call.
///
/// Nested failures are flattened: composite nodes prefix each child error
/// with the path segment it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            value: None,
        }
    }

    /// Valid when `errors` is empty.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            value: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Whether any error message contains `needle`.
    pub fn has_error(&self, needle: &str) -> bool {
        self.errors.iter().any(|err| err.contains(needle))
    }
}

/// Prefix every error with a path segment, e.g. `"Error at index 2: "`.
pub(crate) fn prefix_errors(prefix: &str, errors: Vec<String>) -> impl Iterator<Item = String> + '_ {
    errors.into_iter().map(move |err| format!("{prefix}{err}"))
}
