use clap::{Args, Subcommand};
use std::path::PathBuf;

use valkit_schema::{ProviderConfig, SchemaFileProvider, SCHEMA_PATH_ENV};

use crate::exit::{schema_error, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod validate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile every schema in a document.
    Check(CheckArgs),
    /// Validate an instance against a named schema.
    Validate(ValidateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Validate(args) => validate::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SchemaSource {
    /// Schema document, or base path probed with .json/.yaml/.yml.
    #[arg(long, value_name = "PATH", env = SCHEMA_PATH_ENV)]
    pub schema: Option<PathBuf>,
}

impl SchemaSource {
    pub fn open(&self) -> CliResult<SchemaFileProvider> {
        let config = match &self.schema {
            Some(path) => ProviderConfig::with_base_path(path),
            None => ProviderConfig::default(),
        };
        SchemaFileProvider::open(&config).map_err(|err| schema_error("schema load failed", err))
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SchemaSource,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Entity key of the schema to validate against.
    pub entity: String,
    #[command(flatten)]
    pub source: SchemaSource,
    /// Instance as inline JSON.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the instance from a JSON or YAML file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
