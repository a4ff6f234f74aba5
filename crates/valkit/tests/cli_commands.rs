#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SCHEMAS_YAML: &str = r#"
user:
  type: object
  required: [name, email]
  properties:
    name: { type: string, minLength: 2 }
    email: { type: string }
    tags:
      type: array
      items: { type: string }
node:
  type: lazy
  propertyName: child
  schema:
    type: object
    required: [id]
    properties:
      id: { type: number, integer: true }
      child: { type: any, nullable: true }
"#;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "valkit-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write_schemas(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("schemas.yaml");
    std::fs::write(&path, contents).expect("schema file should be writable");
    path
}

fn valkit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_valkit"))
        .env_remove("VALKIT_SCHEMA_PATH")
        .arg("--log-level")
        .arg("error")
        .arg("--format")
        .arg("json")
        .args(args)
        .output()
        .expect("valkit should run")
}

#[test]
fn validate_valid_instance_exits_zero() {
    let dir = unique_temp_dir("valid");
    let schemas = write_schemas(&dir, SCHEMAS_YAML);

    let output = valkit(&[
        "validate",
        "user",
        "--schema",
        schemas.to_str().unwrap(),
        "--json",
        r#"{"name":"Ann","email":"ann@example.com","tags":["a"]}"#,
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation-result.schema.json"));
    assert!(stdout.contains("\"isValid\":true"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn validate_invalid_instance_exits_60_with_errors() {
    let dir = unique_temp_dir("invalid");
    write_schemas(&dir, SCHEMAS_YAML);
    let base = dir.join("schemas");

    let output = valkit(&[
        "validate",
        "user",
        "--schema",
        base.to_str().unwrap(),
        "--json",
        r#"{"name":"A","tags":[1]}"#,
    ]);

    assert_eq!(output.status.code(), Some(60));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout should be json");
    let errors: Vec<&str> = value["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|err| err.as_str())
        .collect();
    assert!(errors.contains(&"Validation failed for property 'email': Property is missing."));
    assert!(errors.contains(
        &"Validation failed for property 'tags': Error at index 0: Value must be a string."
    ));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn validate_reads_yaml_instance_file() {
    let dir = unique_temp_dir("yaml-instance");
    let schemas = write_schemas(&dir, SCHEMAS_YAML);
    let instance = dir.join("tree.yml");
    std::fs::write(&instance, "id: 1\nchild:\n  id: 2\n  child:\n    id: 3.5\n").unwrap();

    let output = valkit(&[
        "validate",
        "node",
        "--schema",
        schemas.to_str().unwrap(),
        "--file",
        instance.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(60));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Value must be an integer."));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unknown_entity_is_usage_error() {
    let dir = unique_temp_dir("missing-entity");
    let schemas = write_schemas(&dir, SCHEMAS_YAML);

    let output = valkit(&[
        "validate",
        "order",
        "--schema",
        schemas.to_str().unwrap(),
        "--json",
        "{}",
    ]);

    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("schema 'order' is not defined"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn check_lists_entities() {
    let dir = unique_temp_dir("check");
    let schemas = write_schemas(&dir, SCHEMAS_YAML);

    let output = valkit(&["check", "--schema", schemas.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("check-report.schema.json"));
    assert!(stdout.contains(r#"{"entity":"node","kind":"lazy"}"#));
    assert!(stdout.contains(r#"{"entity":"user","kind":"object"}"#));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn check_unsupported_type_exits_60() {
    let dir = unique_temp_dir("check-bad");
    let schemas = write_schemas(&dir, "thing:\n  type: uuid\n");

    let output = valkit(&["check", "--schema", schemas.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported schema type 'uuid'"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_schema_path_is_usage_error() {
    let output = valkit(&["check"]);
    assert_eq!(output.status.code(), Some(64));
}
