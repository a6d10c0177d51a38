use codeshrink::cli::{minify_batch, Cli};
use codeshrink::infrastructure::file_system::discover_inputs_blocking;
use codeshrink::utils::MinificationProfiler;
use codeshrink::{AdvancedMinifier, CliConfig, MinifyError};
use clap::Parser;
use tempfile::tempdir;

#[test]
fn test_batch_writes_min_files_beside_sources() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("site.css"), "body {\n  margin: 0;\n}\n").unwrap();
    std::fs::write(root.join("data.json"), "{ \"a\" : [ 1, 2 ] }").unwrap();
    std::fs::write(root.join("broken.json"), "{ \"a\" : ").unwrap();

    let inputs = discover_inputs_blocking(root, false).unwrap();
    let config = CliConfig::new(root.to_string_lossy());
    let profiler = MinificationProfiler::new();
    let summary = minify_batch(&inputs, root, &config, &AdvancedMinifier::new(), &profiler).unwrap();

    assert_eq!(summary.files.len(), 3);
    assert_eq!(summary.failed(), 1);
    assert_eq!(std::fs::read_to_string(root.join("data.min.json")).unwrap(), r#"{"a":[1,2]}"#);
    assert!(root.join("site.min.css").exists());
    assert!(!root.join("broken.min.json").exists());
    assert_eq!(profiler.summary().count, 3);
}

#[test]
fn test_output_directory_mirrors_layout() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir_all(src.join("nested")).unwrap();
    std::fs::write(src.join("nested/app.js"), "let  a = 1;\n").unwrap();

    let out = dir.path().join("dist");
    let mut config = CliConfig::new(src.to_string_lossy()).with_output(out.to_string_lossy());
    config.recursive = true;

    let inputs = discover_inputs_blocking(&src, true).unwrap();
    minify_batch(&inputs, &src, &config, &AdvancedMinifier::new(), &MinificationProfiler::new()).unwrap();
    assert!(out.join("nested/app.js").exists());
}

#[test]
fn test_empty_file_aborts_before_any_output() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("a.css"), "a { color: red; }").unwrap();
    std::fs::write(root.join("b.css"), "").unwrap();

    let inputs = discover_inputs_blocking(root, false).unwrap();
    let config = CliConfig::new(root.to_string_lossy());
    let err = minify_batch(&inputs, root, &config, &AdvancedMinifier::new(), &MinificationProfiler::new())
        .unwrap_err();

    assert!(matches!(err, MinifyError::EmptyFile { .. }));
    assert!(!root.join("a.min.css").exists());
}

#[test]
fn test_worker_and_detect_subcommands_parse() {
    assert!(Cli::try_parse_from(["codeshrink", "worker"]).is_ok());
    assert!(Cli::try_parse_from(["codeshrink", "detect", "app.js"]).is_ok());
    assert!(Cli::try_parse_from(["codeshrink", "generate", "gradle"]).is_err());
}
