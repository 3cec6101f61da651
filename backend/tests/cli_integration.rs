//! Integration tests for the filmdash CLI
//!
//! Each test writes a small catalogue to a temporary directory and runs the
//! real binary against it.

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const CATALOGUE: &str = "\
Title,Genre,Premiere,Runtime,IMDB Score,Language
Enter the Anime,Documentary,\"August 5, 2019\",58,2.5,English/Japanese
Dark Forces,Thriller,\"August 21, 2020\",81,2.6,Spanish
Seaspiracy,Documentary,\"March 24, 2021\",89,8.2,English
Crip Camp,Documentary,\"March 25, 2020\",108,7.7,English
Zero Score,Documentary,\"May 1, 2020\",90,0,English
Undated,Documentary,someday,80,6.0,English/French
Incomplete,Documentary,\"May 1, 2020\",,9.9,English
";

/// Helper to write the catalogue and return its path
fn catalogue(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("films.csv");
    fs::write(&path, CATALOGUE).expect("Failed to write catalogue");
    path
}

/// Helper to run filmdash with arguments
fn run_filmdash(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_filmdash"))
        .args(args)
        .output()
        .expect("Failed to execute filmdash")
}

/// Helper to parse stdout as JSON
fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

/// Helper to get stderr as string
fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_help_command() {
    let output = run_filmdash(&["--help"]);
    assert!(output.status.success());
    let out = String::from_utf8_lossy(&output.stdout);
    assert!(out.contains("filmdash"));
    assert!(out.contains("stats"));
}

#[test]
fn test_count_languages() {
    let dir = TempDir::new().unwrap();
    let path = catalogue(&dir);

    let output = run_filmdash(&["count", path.to_str().unwrap(), "--field", "language"]);
    assert!(output.status.success(), "count failed: {}", stderr(&output));

    let json = stdout_json(&output);
    assert_eq!(json["English"], 5);
    assert_eq!(json["Japanese"], 1);
    assert_eq!(json["French"], 1);
}

#[test]
fn test_stats() {
    let dir = TempDir::new().unwrap();
    let path = catalogue(&dir);

    let output = run_filmdash(&[
        "stats",
        path.to_str().unwrap(),
        "--genre",
        "Documentary",
        "--language",
        "ENGLISH",
    ]);
    assert!(output.status.success(), "stats failed: {}", stderr(&output));

    let json = stdout_json(&output);
    assert_eq!(json["count"], 5);
    let mean = json["meanScore"].as_f64().unwrap();
    assert!((mean - 4.88).abs() < 1e-9);
}

#[test]
fn test_top_excludes_zero_scores() {
    let dir = TempDir::new().unwrap();
    let path = catalogue(&dir);

    let output = run_filmdash(&[
        "top",
        path.to_str().unwrap(),
        "--genre",
        "Documentary",
        "--language",
        "english",
        "-n",
        "3",
    ]);
    assert!(output.status.success(), "top failed: {}", stderr(&output));

    let json = stdout_json(&output);
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Seaspiracy", "Crip Camp", "Undated"]);
}

#[test]
fn test_years_and_distribution() {
    let dir = TempDir::new().unwrap();
    let path = catalogue(&dir);

    let output = run_filmdash(&["years", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!([2019, 2020, 2021]));

    let output = run_filmdash(&["languages-by-year", path.to_str().unwrap(), "--year", "2020"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["English"], 2);
    assert_eq!(json["Spanish"], 1);
}

#[test]
fn test_schema_mismatch_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.csv");
    fs::write(&path, "Title,Genre,IMDB Score\nRoma,Drama,7.7\n").unwrap();

    let output = run_filmdash(&[
        "stats",
        path.to_str().unwrap(),
        "--genre",
        "Drama",
        "--language",
        "Spanish",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Language"));
}

#[test]
fn test_missing_file_fails() {
    let output = run_filmdash(&["years", "/nonexistent/films.csv"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error"));
}
