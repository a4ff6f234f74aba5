use std::path::PathBuf;

/// Errors raised while locating, loading or compiling declarative schemas.
///
/// Validation itself never produces these; a rejected value is reported
/// through [`ValidationResult`](crate::ValidationResult).
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// No base path was configured.
    #[error("no schema path configured (set VALKIT_SCHEMA_PATH)")]
    MissingBasePath,

    /// The schema path has an extension other than json/yaml/yml.
    #[error("unsupported schema file extension: {}", .0.display())]
    UnsupportedExtension(PathBuf),

    /// An explicit schema path does not exist.
    #[error("schema file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// No `<base>.json`, `<base>.yaml` or `<base>.yml` exists.
    #[error("no schema file with a json, yaml or yml extension at {}", .0.display())]
    NoDocument(PathBuf),

    /// The document could not be read.
    #[error("failed to load schema document: {0}")]
    LoadFailed(String),

    /// The document is not valid JSON/YAML or has the wrong shape.
    #[error("failed to parse schema document {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// The requested entity key is not defined in the document.
    #[error("schema '{0}' is not defined in the document")]
    MissingEntity(String),

    /// A definition carries a `type` tag the compiler does not know.
    #[error("unsupported schema type '{tag}' at {path}")]
    UnsupportedType { tag: String, path: String },

    /// A definition is malformed (missing or mistyped field).
    #[error("invalid schema definition at {path}: {message}")]
    InvalidDefinition { path: String, message: String },

    /// A `transformFn` names a transform that is not registered.
    #[error("unknown transform '{name}' at {path}")]
    UnknownTransform { name: String, path: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
