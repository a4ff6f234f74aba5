use std::fmt;

use valkit_schema::SchemaError;

// Exit codes shared with the rest of the 3leaps tooling.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    let code = match &err {
        SchemaError::MissingBasePath
        | SchemaError::UnsupportedExtension(_)
        | SchemaError::MissingEntity(_) => USAGE,
        SchemaError::NotFound(_) | SchemaError::NoDocument(_) | SchemaError::LoadFailed(_) => {
            FAILURE
        }
        SchemaError::Parse { .. }
        | SchemaError::UnsupportedType { .. }
        | SchemaError::InvalidDefinition { .. }
        | SchemaError::UnknownTransform { .. } => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_errors_map_to_exit_codes() {
        assert_eq!(schema_error("x", SchemaError::MissingBasePath).code, USAGE);
        assert_eq!(
            schema_error("x", SchemaError::MissingEntity("user".to_string())).code,
            USAGE
        );
        assert_eq!(
            schema_error(
                "x",
                SchemaError::UnsupportedType {
                    tag: "uuid".to_string(),
                    path: "user".to_string()
                }
            )
            .code,
            DATA_INVALID
        );
        assert_eq!(
            schema_error("x", SchemaError::LoadFailed("gone".to_string())).code,
            FAILURE
        );
    }

    #[test]
    fn message_keeps_context() {
        let err = schema_error("schema load failed", SchemaError::MissingEntity("user".to_string()));
        assert_eq!(
            err.to_string(),
            "schema load failed: schema 'user' is not defined in the document"
        );
    }
}
