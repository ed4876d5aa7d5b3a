//! Tests for validation.rs

use std::fs;

use tempfile::tempdir;
use txt_stats::validation::InputValidator;
use txt_stats::TxtStatsError;

#[test]
fn test_validate_handle_id_valid() {
    assert_eq!(InputValidator::validate_handle_id("42").expect("valid handle"), 42);
    assert_eq!(InputValidator::validate_handle_id(" 7 ").expect("valid handle"), 7);
    assert_eq!(InputValidator::validate_handle_id("0").expect("valid handle"), 0);
}

#[test]
fn test_validate_handle_id_empty() {
    assert!(InputValidator::validate_handle_id("").is_err());
    assert!(InputValidator::validate_handle_id("   ").is_err());
}

#[test]
fn test_validate_handle_id_not_numeric() {
    let err = InputValidator::validate_handle_id("+15551234567x").expect_err("not an integer");
    assert!(matches!(err, TxtStatsError::InvalidInput(_)));
    assert!(InputValidator::validate_handle_id("john").is_err());
}

#[test]
fn test_validate_handle_id_negative() {
    assert!(InputValidator::validate_handle_id("-3").is_err());
}

#[test]
fn test_validate_handle_pair() {
    let pair = InputValidator::validate_handle_pair("3", "12").expect("valid pair");
    assert_eq!((pair.first, pair.second), (3, 12));

    // The same handle twice is allowed
    let same = InputValidator::validate_handle_pair("5", "5").expect("valid pair");
    assert_eq!(same.first, same.second);

    assert!(InputValidator::validate_handle_pair("3", "x").is_err());
}

#[test]
fn test_validate_source_db() {
    let dir = tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("chat.db");

    let err = InputValidator::validate_source_db(&missing).expect_err("missing store");
    assert!(matches!(err, TxtStatsError::SourceNotFound(_)));

    // A directory is not a store
    assert!(InputValidator::validate_source_db(dir.path()).is_err());

    fs::write(&missing, b"").expect("Failed to create file");
    assert!(InputValidator::validate_source_db(&missing).is_ok());
}

#[test]
fn test_validate_input_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let csv = dir.path().join("messages.csv");

    assert!(InputValidator::validate_input_csv(&csv).is_err());
    assert!(InputValidator::validate_input_csv(std::path::Path::new("")).is_err());

    fs::write(&csv, "index,text\n").expect("Failed to write csv");
    assert!(InputValidator::validate_input_csv(&csv).is_ok());
}

#[test]
fn test_validate_output_file() {
    let dir = tempdir().expect("Failed to create temp dir");

    assert!(InputValidator::validate_output_file(&dir.path().join("messages.csv")).is_ok());
    assert!(InputValidator::validate_output_file(std::path::Path::new("messages.csv")).is_ok());
    assert!(InputValidator::validate_output_file(dir.path()).is_err());
    assert!(InputValidator::validate_output_file(&dir.path().join("missing").join("messages.csv")).is_err());
}

#[test]
fn test_ensure_output_dir_creates_missing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let nested = dir.path().join("charts").join("run1");

    InputValidator::ensure_output_dir(&nested).expect("Failed to create output dir");
    assert!(nested.is_dir());

    let file = dir.path().join("file.txt");
    fs::write(&file, "x").expect("Failed to write file");
    assert!(InputValidator::ensure_output_dir(&file).is_err());
}

#[test]
fn test_validate_style() {
    let style = InputValidator::validate_style("ggplot").expect("known style");
    assert_eq!(style.name(), "ggplot");

    let err = InputValidator::validate_style("neon").expect_err("unknown style");
    assert!(matches!(err, TxtStatsError::InvalidStyle { .. }));
}
