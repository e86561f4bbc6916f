//! Integration tests for numbase CLI.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn numbase() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_numbase"));
    // Keep the user's config file and log filter out of the tests.
    cmd.args(["--config", "/nonexistent/numbase/config.toml"]);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn test_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("numbase-it-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help() {
    let output = numbase().arg("--help").output().unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("Numeral conversion between binary, decimal and hexadecimal"));
}

#[test]
fn test_list() {
    let output = numbase().arg("list").output().unwrap();

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("BINARY_TO_DECIMAL"));
    assert!(out.contains("Hexadecimal to Binary"));
    assert!(out.contains("NumericBaseConversion"));
}

#[test]
fn test_convert_values() {
    let output = numbase()
        .args(["convert", "--mode", "HEXA_TO_DECIMAL", "0x3D", "3Dh", "FFFFFFFFFFFFFFFF", "xyz"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "61\n61\n18446744073709551615\n\n");
}

#[test]
fn test_convert_decimal_to_hexa() {
    let output = numbase()
        .args(["convert", "-m", "DECIMAL_TO_HEXA", "10", "-1", "10.1", "255"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "A\n\n\nFF\n");
}

#[test]
fn test_convert_stdin() {
    let mut child = numbase()
        .args(["convert", "--mode", "BINARY_TO_DECIMAL"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"11011b\r\n11B\n2\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "27\n3\n\n");
}

#[test]
fn test_convert_unknown_mode() {
    let output = numbase()
        .args(["convert", "--mode", "hex2dec", "FF"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Unknown conversion mode 'hex2dec'"));
    assert!(err.contains("HEXA_TO_DECIMAL"));
}

#[test]
fn test_convert_without_mode() {
    let output = numbase().args(["convert", "101"]).output().unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No conversion mode given"));
}

#[test]
fn test_process_csv() {
    let input = test_file("codes.csv", "id,code\n1,0x3D\n2,\n3,zz\n4,FFh\n");
    let out = input.with_file_name("codes.out.csv");

    let output = numbase()
        .args(["-q", "process"])
        .arg(&input)
        .args(["-o"])
        .arg(&out)
        .args(["--input-column", "code", "--output-column", "value"])
        .args(["--mode", "HEXA_TO_DECIMAL"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "id,code,value\n1,0x3D,61\n2,,\n3,zz,\n4,FFh,255\n"
    );
}

#[test]
fn test_process_ndjson_to_stdout() {
    let input = test_file(
        "numbers.ndjson",
        "{\"n\": \"6\"}\n{\"n\": 255}\n{\"n\": null}\n",
    );

    let output = numbase()
        .args(["-q", "process"])
        .arg(&input)
        .args(["--input-column", "n", "--mode", "DECIMAL_TO_BINARY"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "{\"n\":\"110\"}\n{\"n\":\"11111111\"}\n{\"n\":null}\n"
    );
}

#[test]
fn test_process_ndjson_keeps_exact_numbers() {
    let input = test_file(
        "wide.ndjson",
        "{\"n\": 18446744073709551616, \"meta\": {\"src\": [1, 2]}}\n{\"n\": 10.0, \"keep\": 9007199254740993}\n",
    );

    let output = numbase()
        .args(["-q", "process"])
        .arg(&input)
        .args(["--input-column", "n", "--output-column", "hex", "--mode", "DECIMAL_TO_HEXA"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "{\"n\":18446744073709551616,\"meta\":{\"src\":[1,2]},\"hex\":\"10000000000000000\"}\n\
         {\"n\":10.0,\"keep\":9007199254740993}\n"
    );
}

#[test]
fn test_process_csv_rejects_long_record() {
    let input = test_file("long.csv", "code\n0x3D\n0x3E,extra\n");

    let output = numbase()
        .args(["-q", "process"])
        .arg(&input)
        .args(["--input-column", "code", "--mode", "HEXA_TO_DECIMAL"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("CSV record 2 has 2 fields but the header has 1"));
}

#[test]
fn test_process_params_file() {
    let input = test_file("flags.csv", "flags\n1010\n");
    let params = test_file(
        "step.yaml",
        "inputColumn: flags\noutputColumn: hex\nprocessingMode: BINARY_TO_HEXA\n",
    );

    let output = numbase()
        .args(["-q", "process"])
        .arg(&input)
        .arg("--params")
        .arg(&params)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "flags,hex\n1010,A\n");
}

#[test]
fn test_process_missing_column_warns() {
    let input = test_file("other.csv", "a\n1\n");

    let output = numbase()
        .args(["process"])
        .arg(&input)
        .args(["--input-column", "b", "--mode", "DECIMAL_TO_HEXA"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "a,b\n1,\n");
    assert!(stderr(&output).contains("input column not found"));
}

#[test]
fn test_process_missing_file() {
    let output = numbase()
        .args(["process", "/nonexistent/rows.csv", "--input-column", "a"])
        .args(["--mode", "DECIMAL_TO_HEXA"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read '/nonexistent/rows.csv': file not found"));
}

#[test]
fn test_describe() {
    let output = numbase().arg("describe").output().unwrap();

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("This processor performs base conversion."));
    assert!(out.contains("processingMode"));
    assert!(out.contains("[default: BINARY_TO_DECIMAL]"));
}

#[test]
fn test_describe_json() {
    let output = numbase().args(["describe", "--json"]).output().unwrap();

    assert!(output.status.success());
    let form: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(form["name"], "NumericBaseConversion");
    assert_eq!(form["params"][1]["name"], "processingMode");
    assert_eq!(form["params"][1]["kind"]["type"], "select");
}

#[test]
fn test_presets_from_config() {
    let config = test_file(
        "config.toml",
        "[presets.codes]\ninput_column = \"code\"\nmode = \"HEXA_TO_DECIMAL\"\n",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_numbase"))
        .arg("--config")
        .arg(&config)
        .arg("presets")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("codes        input_column=code, mode=HEXA_TO_DECIMAL"));
}
