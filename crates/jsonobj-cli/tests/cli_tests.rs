//! Integration tests for the `jsonobj` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the get, fmt and
//! keys subcommands through the actual binary, including stdin/stdout piping,
//! file I/O and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the people.json fixture.
fn people_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/people.json")
}

/// Helper: path to the array.json fixture.
fn array_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/array.json")
}

fn jsonobj() -> Command {
    let mut cmd = Command::cargo_bin("jsonobj").unwrap();
    cmd.env_remove("JSONOBJ_INDENT");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// get
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn get_attribute_path_from_file() {
    jsonobj()
        .args(["get", "knows[0].name", "-i", people_json_path()])
        .assert()
        .success()
        .stdout("\"Dave Longley\"\n");
}

#[test]
fn get_quoted_key_from_stdin() {
    jsonobj()
        .args(["get", r#"["@context"].name"#])
        .write_stdin(std::fs::read_to_string(people_json_path()).unwrap())
        .assert()
        .success()
        .stdout("\"http://xmlns.com/foaf/0.1/name\"\n");
}

#[test]
fn get_index_on_array_document() {
    jsonobj()
        .args(["get", "[2]", "-i", array_json_path()])
        .assert()
        .success()
        .stdout("-12.7\n");
}

#[test]
fn get_object_compact() {
    jsonobj()
        .args(["get", "knows[0]", "--compact", "-i", people_json_path()])
        .assert()
        .success()
        .stdout("{\"name\":\"Dave Longley\",\"etag\":\"def\",\"modelDate\":\"01/01/2015\"}\n");
}

#[test]
fn get_missing_attribute_fails() {
    jsonobj()
        .args(["get", "nickname", "-i", people_json_path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to resolve path"))
        .stderr(predicate::str::contains("nickname"));
}

#[test]
fn get_invalid_path_fails() {
    jsonobj()
        .args(["get", "a..b", "-i", people_json_path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid path"));
}

// ─────────────────────────────────────────────────────────────────────────────
// fmt
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fmt_defaults_to_three_space_indent() {
    jsonobj()
        .arg("fmt")
        .write_stdin(r#"{"a":{"b":1}}"#)
        .assert()
        .success()
        .stdout("{\n   \"a\": {\n      \"b\": 1\n   }\n}\n");
}

#[test]
fn fmt_compact_preserves_order() {
    jsonobj()
        .args(["fmt", "--compact"])
        .write_stdin(r#"{"z": 1, "a": [1, 2], "_x": 3}"#)
        .assert()
        .success()
        .stdout("{\"z\":1,\"a\":[1,2]}\n");
}

#[test]
fn fmt_indent_from_env() {
    jsonobj()
        .arg("fmt")
        .env("JSONOBJ_INDENT", "1")
        .write_stdin(r#"{"a":1}"#)
        .assert()
        .success()
        .stdout("{\n \"a\": 1\n}\n");
}

#[test]
fn fmt_strip_and_sort() {
    let output = jsonobj()
        .args([
            "fmt",
            "--compact",
            "--strip",
            "etag, modelDate",
            "--sort-keys",
            "-i",
            people_json_path(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(!text.contains("etag"));
    assert!(!text.contains("modelDate"));
    let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["@context", "@id", "knows", "name"]);
}

#[test]
fn fmt_array_document_stays_an_array() {
    jsonobj()
        .args(["fmt", "--compact", "-i", array_json_path()])
        .assert()
        .success()
        .stdout("[1,false,-12.7,\"qwert\"]\n");
}

#[test]
fn fmt_file_to_file() {
    let output_path = std::env::temp_dir().join("jsonobj-test-fmt-output.json");
    let _ = std::fs::remove_file(&output_path);

    jsonobj()
        .args(["fmt", "--compact", "-i", array_json_path(), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    assert_eq!(content, "[1,false,-12.7,\"qwert\"]");
    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn fmt_malformed_input_fails() {
    jsonobj()
        .arg("fmt")
        .write_stdin("{\"a\": ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed JSON"));
}

#[test]
fn fmt_missing_file_fails() {
    jsonobj()
        .args(["fmt", "-i", "/nonexistent/jsonobj/input.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load document"));
}

// ─────────────────────────────────────────────────────────────────────────────
// keys
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn keys_of_root_in_document_order() {
    jsonobj()
        .args(["keys", "-i", people_json_path()])
        .assert()
        .success()
        .stdout("@context\n@id\nname\netag\nknows\n");
}

#[test]
fn keys_of_nested_object() {
    jsonobj()
        .args(["keys", "knows[0]", "-i", people_json_path()])
        .assert()
        .success()
        .stdout("name\netag\nmodelDate\n");
}

#[test]
fn keys_of_scalar_fails() {
    jsonobj()
        .args(["keys", "name", "-i", people_json_path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an object"));
}
