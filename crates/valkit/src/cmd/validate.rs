use std::path::Path;

use valkit_schema::{read_document, DocumentFormat, ProviderConfig, Value};

use crate::cmd::ValidateArgs;
use crate::exit::{schema_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_validation, OutputFormat};

pub fn run(args: ValidateArgs, format: OutputFormat) -> CliResult<i32> {
    let instance = read_instance(&args)?;
    let provider = args.source.open()?;
    let result = provider
        .validate(&args.entity, &instance)
        .map_err(|err| schema_error("validation setup failed", err))?;

    tracing::info!(
        entity = %args.entity,
        valid = result.is_valid,
        errors = result.errors.len(),
        "validated instance"
    );
    print_validation(&args.entity, &result, format);

    if result.is_valid {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}

fn read_instance(args: &ValidateArgs) -> CliResult<Value> {
    match (&args.json, &args.file) {
        (Some(text), _) => parse_instance(text, DocumentFormat::Json, "--json"),
        (None, Some(path)) => {
            let text = read_instance_file(path, ProviderConfig::default().max_document_size)?;
            parse_instance(&text, instance_format(path), &path.display().to_string())
        }
        (None, None) => Err(CliError::new(USAGE, "one of --json or --file is required")),
    }
}

/// Instance files are capped at the same size as schema documents.
fn read_instance_file(path: &Path, max_bytes: usize) -> CliResult<String> {
    read_document(path, max_bytes).map_err(|err| schema_error("instance load failed", err))
}

/// YAML for .yaml/.yml files, JSON otherwise.
fn instance_format(path: &Path) -> DocumentFormat {
    DocumentFormat::from_path(path).unwrap_or(DocumentFormat::Json)
}

fn parse_instance(text: &str, format: DocumentFormat, source: &str) -> CliResult<Value> {
    let parsed: Result<serde_json::Value, String> = match format {
        DocumentFormat::Json => serde_json::from_str(text).map_err(|err| err.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|err| err.to_string()),
    };
    parsed
        .map(Value::from)
        .map_err(|err| CliError::new(DATA_INVALID, format!("invalid instance in {source}: {err}")))
}
