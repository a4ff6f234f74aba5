mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "valkit", version, about = "Schema validation CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "VALKIT_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_validate_subcommand() {
        let cli = Cli::try_parse_from([
            "valkit",
            "validate",
            "user",
            "--schema",
            "/tmp/schemas.yaml",
            "--json",
            "{\"name\":\"x\"}",
        ])
        .expect("validate args should parse");

        assert!(matches!(cli.command, Command::Validate(_)));
    }

    #[test]
    fn rejects_conflicting_instance_args() {
        let err = Cli::try_parse_from([
            "valkit",
            "validate",
            "user",
            "--json",
            "{}",
            "--file",
            "user.json",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_check_subcommand_with_global_format() {
        let cli = Cli::try_parse_from(["valkit", "check", "--schema", "schemas", "--format", "json"])
            .expect("check args should parse");
        assert!(matches!(cli.command, Command::Check(_)));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }
}
