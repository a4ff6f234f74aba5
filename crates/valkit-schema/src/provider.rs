use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value as Json};
use tracing::{debug, info};

use crate::compile::convert_to_schema;
use crate::config::{DocumentFormat, ProviderConfig};
use crate::error::{Result, SchemaError};
use crate::node::SchemaRef;
use crate::result::ValidationResult;
use crate::transform::TransformRegistry;
use crate::value::Value;

/// Named schemas compiled from one declarative document.
///
/// The document is read and parsed once when the provider is built. Each
/// entity is compiled on first request and cached, so a provider can be
/// shared across threads and every `validate` reuses the same node tree.
/// Construct it before handing it to concurrent callers.
pub struct SchemaFileProvider {
    path: Option<PathBuf>,
    definitions: Map<String, Json>,
    transforms: TransformRegistry,
    compiled: RwLock<HashMap<String, SchemaRef>>,
}

impl SchemaFileProvider {
    /// Load the document named by `config` with the default transforms.
    pub fn open(config: &ProviderConfig) -> Result<Self> {
        Self::open_with_transforms(config, TransformRegistry::default())
    }

    /// Load the document named by `VALKIT_SCHEMA_PATH`.
    pub fn from_env() -> Result<Self> {
        Self::open(&ProviderConfig::from_env())
    }

    pub fn open_with_transforms(
        config: &ProviderConfig,
        transforms: TransformRegistry,
    ) -> Result<Self> {
        let path = config.resolve_path()?;
        let format = DocumentFormat::from_path(&path)
            .ok_or_else(|| SchemaError::UnsupportedExtension(path.clone()))?;
        let content = read_document(&path, config.max_document_size)?;
        let definitions = parse_document(&content, format, &path.display().to_string())?;

        info!(path = %path.display(), entities = definitions.len(), "loaded schema document");
        Ok(Self {
            path: Some(path),
            definitions,
            transforms,
            compiled: RwLock::new(HashMap::new()),
        })
    }

    /// Build a provider from document text.
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self> {
        let definitions = parse_document(content, format, "<inline>")?;
        Ok(Self::from_definitions(definitions))
    }

    /// Build a provider from an already parsed document.
    pub fn from_value(document: Json) -> Result<Self> {
        match document {
            Json::Object(definitions) => Ok(Self::from_definitions(definitions)),
            _ => Err(root_not_mapping("<inline>")),
        }
    }

    fn from_definitions(definitions: Map<String, Json>) -> Self {
        Self {
            path: None,
            definitions,
            transforms: TransformRegistry::default(),
            compiled: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the transform registry. Drops anything compiled so far.
    pub fn with_transforms(mut self, transforms: TransformRegistry) -> Self {
        self.transforms = transforms;
        self.compiled = RwLock::new(HashMap::new());
        self
    }

    /// Compiled schema for `key`, compiling it on first use.
    pub fn get_schema(&self, key: &str) -> Result<SchemaRef> {
        if let Some(schema) = self
            .compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            debug!(entity = key, "schema cache hit");
            return Ok(schema.clone());
        }

        let definition = self
            .definitions
            .get(key)
            .ok_or_else(|| SchemaError::MissingEntity(key.to_string()))?;
        let schema = convert_to_schema(definition, &self.transforms, key)?;
        debug!(entity = key, kind = schema.kind(), "compiled schema");

        let mut compiled = self
            .compiled
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(compiled.entry(key.to_string()).or_insert(schema).clone())
    }

    /// Validate `value` against the entity `key`.
    pub fn validate(&self, key: &str, value: &Value) -> Result<ValidationResult> {
        Ok(self.get_schema(key)?.validate(value))
    }

    /// Compile every entity, failing on the first bad definition.
    pub fn compile_all(&self) -> Result<Vec<(String, SchemaRef)>> {
        self.keys()
            .into_iter()
            .map(|key| Ok((key.to_string(), self.get_schema(key)?)))
            .collect()
    }

    /// Entity keys defined in the document, sorted.
    pub fn keys(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    /// Raw declarative definition for `key`.
    pub fn definition(&self, key: &str) -> Option<&Json> {
        self.definitions.get(key)
    }

    /// Resolved document path, when loaded from a file.
    pub fn document_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn transforms(&self) -> &TransformRegistry {
        &self.transforms
    }
}

impl std::fmt::Debug for SchemaFileProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaFileProvider")
            .field("path", &self.path)
            .field("entities", &self.keys())
            .finish_non_exhaustive()
    }
}

/// Read a document of at most `max_bytes` bytes.
pub fn read_document(path: &Path, max_bytes: usize) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|err| {
        SchemaError::LoadFailed(format!("failed opening {}: {err}", path.display()))
    })?;
    let metadata = file
        .metadata()
        .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
    if metadata.len() > max_bytes as u64 {
        return Err(SchemaError::LoadFailed(format!(
            "document too large ({} bytes, max {max_bytes}): {}",
            metadata.len(),
            path.display()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            SchemaError::LoadFailed(format!("failed reading {}: {err}", path.display()))
        })?;
    if content.len() > max_bytes {
        return Err(SchemaError::LoadFailed(format!(
            "document too large while reading: {}",
            path.display()
        )));
    }
    Ok(content)
}

fn parse_document(
    content: &str,
    format: DocumentFormat,
    source_name: &str,
) -> Result<Map<String, Json>> {
    let document: Json = match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|err| SchemaError::Parse {
            source_name: source_name.to_string(),
            message: err.to_string(),
        })?,
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|err| SchemaError::Parse {
            source_name: source_name.to_string(),
            message: err.to_string(),
        })?,
    };
    match document {
        Json::Object(definitions) => Ok(definitions),
        _ => Err(root_not_mapping(source_name)),
    }
}

fn root_not_mapping(source_name: &str) -> SchemaError {
    SchemaError::Parse {
        source_name: source_name.to_string(),
        message: "document root must be a mapping of entity names to definitions".to_string(),
    }
}
