use codeshrink::core::content::*;
use codeshrink::{MinifyError, SupportedLanguage};
use std::fs::File;
use tempfile::tempdir;

#[test]
fn test_detect_language_examples() {
    assert_eq!(detect_language(r#"{"a":1}"#), SupportedLanguage::Json);
    assert_eq!(
        detect_language("<!DOCTYPE html>\n<html><body></body></html>"),
        SupportedLanguage::Html
    );
    assert_eq!(detect_language("def f():\n  pass"), SupportedLanguage::Python);
    assert_eq!(detect_language("just some words"), SupportedLanguage::Javascript);
}

#[test]
fn test_savings_math() {
    let stats = calculate_savings(1000, 600);
    assert_eq!(stats.savings, 400);
    assert_eq!(stats.percentage, 40);
    assert_eq!(calculate_savings(0, 0).percentage, 0);
}

#[test]
fn test_file_size_format() {
    assert_eq!(format_file_size(1536), "1.5 KB");
    assert_eq!(format_file_size(512), "512 B");
}

#[test]
fn test_validate_file_preconditions() {
    let dir = tempdir().unwrap();

    let empty = dir.path().join("empty.js");
    File::create(&empty).unwrap();
    let err = validate_file(&empty).unwrap_err();
    assert!(matches!(err, MinifyError::EmptyFile { .. }));
    assert!(err.to_string().contains("File is empty"));

    let large = dir.path().join("large.css");
    File::create(&large).unwrap().set_len(MAX_FILE_SIZE + 1).unwrap();
    let err = validate_file(&large).unwrap_err();
    assert!(err.to_string().contains("File too large"));
    assert!(err.is_precondition());

    let fine = dir.path().join("fine.css");
    std::fs::write(&fine, "a{}").unwrap();
    assert_eq!(validate_file(&fine).unwrap(), 3);
}

#[test]
fn test_validate_content_flags_broken_input() {
    let json = validate_content("{ nope", SupportedLanguage::Json);
    assert!(!json.valid);
    assert!(!json.errors.is_empty());

    let css = validate_content("a { color: red;", SupportedLanguage::Css);
    assert!(!css.valid);

    let ok = validate_content("a { color: red; }", SupportedLanguage::Css);
    assert!(ok.valid);
}
