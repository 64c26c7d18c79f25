use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn fhir_codec(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fhir-codec"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("fhir-codec should execute")
}

fn json_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("temporary file should be created");
    file.write_all(content.as_bytes())
        .expect("temporary file should be written");
    file
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_validate_valid_observation() {
    let input = json_file(
        r#"{"resourceType": "Observation", "status": "final", "code": {"text": "Steps"}}"#,
    );
    let output = fhir_codec(&["validate", &path_arg(input.path()), "--type", "Observation"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output).trim(), "No errors!");
}

#[test]
fn test_validate_invalid_reports_path() {
    let input = json_file(r#"{"status": 2, "code": {}}"#);
    let output = fhir_codec(&["validate", &path_arg(input.path()), "-t", "Observation"]);

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("Invalid value 2 supplied to : Observation/0:"), "{text}");
    assert!(text.contains("/status: code [FHIR-1-11]"), "{text}");
}

#[test]
fn test_validate_collect_all_json() {
    let input = json_file(r#"{"status": 2, "code": "x", "issued": "today"}"#);
    let output = fhir_codec(&[
        "validate",
        &path_arg(input.path()),
        "--type",
        "Observation",
        "--collect-all",
        "--format",
        "json",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["is_valid"], serde_json::json!(false));
    let paths: Vec<&str> = report["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["status", "code", "issued"]);
}

#[test]
fn test_validate_unknown_fields_reject() {
    let input = json_file(r#"{"status": "final", "code": {}, "extra": true}"#);
    let lenient = fhir_codec(&["validate", &path_arg(input.path()), "-t", "Observation"]);
    assert!(lenient.status.success());

    let strict = fhir_codec(&[
        "validate",
        &path_arg(input.path()),
        "-t",
        "Observation",
        "--unknown-fields",
        "reject",
    ]);
    assert_eq!(strict.status.code(), Some(1));
    assert!(stdout(&strict).contains("[FHIR-1-18]"));
}

#[test]
fn test_validate_at_path() {
    let input = json_file(
        r#"{"section": [{"title": "ok"}, {"title": "Meds", "code": {"text": "x"}}]}"#,
    );
    let output = fhir_codec(&[
        "validate",
        &path_arg(input.path()),
        "--type",
        "CompositionSection",
        "--at",
        "section/1",
    ]);
    assert!(output.status.success(), "{}", stdout(&output));

    let missing = fhir_codec(&[
        "validate",
        &path_arg(input.path()),
        "--type",
        "CompositionSection",
        "--at",
        "section/5",
    ]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("Cannot select 'section/5'"));
}

#[test]
fn test_validate_with_config_file() {
    let mut config = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(config, "unknown_fields: reject").unwrap();
    let input = json_file(r#"{"system": "http://loinc.org", "extra": 1}"#);

    let output = fhir_codec(&[
        "--config",
        &path_arg(config.path()),
        "validate",
        &path_arg(input.path()),
        "--type",
        "Coding",
    ]);
    assert_eq!(output.status.code(), Some(1));

    let overridden = fhir_codec(&[
        "--config",
        &path_arg(config.path()),
        "validate",
        &path_arg(input.path()),
        "--type",
        "Coding",
        "--unknown-fields",
        "preserve",
    ]);
    assert!(overridden.status.success());
}

#[test]
fn test_validate_unknown_type() {
    let input = json_file("{}");
    let output = fhir_codec(&["validate", &path_arg(input.path()), "--type", "Patient"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown type 'Patient'"));
}

#[test]
fn test_check_primitives() {
    let ok = fhir_codec(&["check", "code", "55423-8"]);
    assert!(ok.status.success());
    assert_eq!(stdout(&ok).trim(), "valid code");

    let bad = fhir_codec(&["check", "code", "2"]);
    assert_eq!(bad.status.code(), Some(1));
    assert_eq!(stdout(&bad).trim(), "Invalid value 2 supplied to : code");

    let date = fhir_codec(&["check", "date", "08/23"]);
    assert_eq!(
        stdout(&date).trim(),
        r#"Invalid value "08/23" supplied to : date"#
    );

    assert!(fhir_codec(&["check", "positiveInt", "1"]).status.success());
    assert!(!fhir_codec(&["check", "positiveInt", "0"]).status.success());
    assert!(!fhir_codec(&["check", "nonsense", "1"]).status.success());
}

#[test]
fn test_types_lists_registry() {
    let output = fhir_codec(&["types"]);
    assert!(output.status.success());
    let names: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    for expected in ["Composition", "Extension", "GroupCharacteristic", "dateTime"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
}
