use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use valkit_schema::ValidationResult;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ValidationOutput<'a> {
    schema_id: &'a str,
    entity: &'a str,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

pub fn print_validation(entity: &str, result: &ValidationResult, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ValidationOutput {
                schema_id: "https://schemas.3leaps.dev/valkit/cli/v1/validation-result.schema.json",
                entity,
                result,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ENTITY", "VALID", "ERROR"]);
            if result.errors.is_empty() {
                table.add_row(vec![entity.to_string(), result.is_valid.to_string(), String::new()]);
            }
            for err in &result.errors {
                table.add_row(vec![entity.to_string(), result.is_valid.to_string(), err.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let verdict = if result.is_valid { "valid" } else { "invalid" };
            println!("{entity}: {verdict}");
            for err in &result.errors {
                println!("  - {err}");
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckEntry {
    pub entity: String,
    pub kind: &'static str,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    schema_id: &'a str,
    document: &'a str,
    entities: &'a [CheckEntry],
}

pub fn print_check(document: &str, entries: &[CheckEntry], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = CheckOutput {
                schema_id: "https://schemas.3leaps.dev/valkit/cli/v1/check-report.schema.json",
                document,
                entities: entries,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ENTITY", "KIND"]);
            for entry in entries {
                table.add_row(vec![entry.entity.clone(), entry.kind.to_string()]);
            }
            println!("{document}\n{table}");
        }
        OutputFormat::Pretty => {
            println!("{document}: {} entities compiled", entries.len());
            for entry in entries {
                println!("  {:<24} {}", entry.entity, entry.kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_output_flattens_result() {
        let result = ValidationResult::from_errors(vec!["Value is required.".to_string()]);
        let out = ValidationOutput {
            schema_id: "x",
            entity: "user",
            result: &result,
        };
        let json = serde_json::to_string(&out).expect("validation output should serialize");
        assert_eq!(
            json,
            r#"{"schema_id":"x","entity":"user","isValid":false,"errors":["Value is required."]}"#
        );
    }
}
