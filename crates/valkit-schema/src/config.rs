use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Result, SchemaError};

/// Environment variable naming the schema document or its base path.
pub const SCHEMA_PATH_ENV: &str = "VALKIT_SCHEMA_PATH";

/// Recognized document extensions, in probing order.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Serialization format of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Format for a file extension, case-insensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Controls where schema documents are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Either a file with a recognized extension, or a base path that is
    /// probed with each of [`SUPPORTED_EXTENSIONS`].
    pub base_path: Option<PathBuf>,
    /// Maximum bytes read from a schema document.
    pub max_document_size: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            max_document_size: 1024 * 1024,
        }
    }
}

impl ProviderConfig {
    /// Config whose base path comes from `VALKIT_SCHEMA_PATH`, if set.
    pub fn from_env() -> Self {
        Self {
            base_path: std::env::var_os(SCHEMA_PATH_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            ..Self::default()
        }
    }

    pub fn with_base_path(path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Resolve the configured path to an existing document.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        let base = self.base_path.as_ref().ok_or(SchemaError::MissingBasePath)?;

        if base.extension().is_some() {
            if DocumentFormat::from_path(base).is_none() {
                return Err(SchemaError::UnsupportedExtension(base.clone()));
            }
            if !base.is_file() {
                return Err(SchemaError::NotFound(base.clone()));
            }
            return Ok(base.clone());
        }

        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| with_appended_extension(base, ext))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| SchemaError::NoDocument(base.clone()))
    }
}

fn with_appended_extension(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "valkit-config-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("JSON"), Some(DocumentFormat::Json));
        assert_eq!(DocumentFormat::from_extension("yml"), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_extension("toml"), None);
    }

    #[test]
    fn missing_base_path_fails() {
        assert!(matches!(
            ProviderConfig::default().resolve_path(),
            Err(SchemaError::MissingBasePath)
        ));
    }

    #[test]
    fn explicit_path_must_have_supported_extension_and_exist() {
        let dir = make_temp_dir("explicit");
        let txt = dir.join("schemas.txt");
        std::fs::write(&txt, "{}").unwrap();
        assert!(matches!(
            ProviderConfig::with_base_path(&txt).resolve_path(),
            Err(SchemaError::UnsupportedExtension(_))
        ));

        let missing = dir.join("missing.yaml");
        assert!(matches!(
            ProviderConfig::with_base_path(&missing).resolve_path(),
            Err(SchemaError::NotFound(_))
        ));

        let json = dir.join("schemas.json");
        std::fs::write(&json, "{}").unwrap();
        assert_eq!(
            ProviderConfig::with_base_path(&json).resolve_path().unwrap(),
            json
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn base_path_is_probed_in_extension_order() {
        let dir = make_temp_dir("probe");
        let base = dir.join("schemas");
        assert!(matches!(
            ProviderConfig::with_base_path(&base).resolve_path(),
            Err(SchemaError::NoDocument(_))
        ));

        std::fs::write(dir.join("schemas.yml"), "{}").unwrap();
        assert_eq!(
            ProviderConfig::with_base_path(&base).resolve_path().unwrap(),
            dir.join("schemas.yml")
        );

        std::fs::write(dir.join("schemas.json"), "{}").unwrap();
        assert_eq!(
            ProviderConfig::with_base_path(&base).resolve_path().unwrap(),
            dir.join("schemas.json")
        );
        let _ = std::fs::remove_dir_all(&dir);
    }
}
