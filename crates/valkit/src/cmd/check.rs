use crate::cmd::CheckArgs;
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_check, CheckEntry, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let provider = args.source.open()?;
    let compiled = provider
        .compile_all()
        .map_err(|err| schema_error("schema compile failed", err))?;

    let document = provider
        .document_path()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    tracing::info!(document = %document, entities = compiled.len(), "schema document compiled");

    let entries: Vec<CheckEntry> = compiled
        .iter()
        .map(|(entity, schema)| CheckEntry {
            entity: entity.clone(),
            kind: schema.kind(),
        })
        .collect();
    print_check(&document, &entries, format);
    Ok(SUCCESS)
}
