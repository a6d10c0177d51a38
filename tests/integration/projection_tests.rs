use codeshrink::projection::*;
use codeshrink::utils::ConfigLoader;
use codeshrink::{CliConfig, MinificationLevel};
use tempfile::tempdir;

#[test]
fn test_cli_command_is_deterministic() {
    let config = CliConfig::new("app.js").with_level(MinificationLevel::Aggressive);
    let first = generate_cli_command(&config);
    assert_eq!(first, generate_cli_command(&config.clone()));
    assert!(first.starts_with("codeshrink --input \"app.js\""));
    assert!(first.contains("--level aggressive"));

    let moderate = CliConfig::new("app.js").with_level(MinificationLevel::Moderate);
    assert!(!generate_cli_command(&moderate).contains("--level"));
}

#[test]
fn test_generated_config_file_loads() {
    let dir = tempdir().unwrap();
    let mut config = CliConfig::new("src").with_level(MinificationLevel::Light);
    config.recursive = true;
    config.options.remove_comments = false;

    let path = dir.path().join("codeshrink.config.json");
    std::fs::write(&path, ProjectionTarget::Config.render(&config, &[])).unwrap();

    let loaded = ConfigLoader::load(Some(&path), dir.path()).unwrap();
    let merged = ConfigLoader::merge_with_cli(loaded, Default::default());
    assert_eq!(merged, config);
}

#[test]
fn test_script_targets_share_the_base_command() {
    let config = CliConfig::new("src");
    let base = generate_cli_command(&config);
    assert!(ProjectionTarget::Make.render(&config, &[]).contains(&format!("\t{}\n", base)));

    let npm: serde_json::Value = serde_json::from_str(&ProjectionTarget::Npm.render(&config, &[])).unwrap();
    assert_eq!(npm["scripts"]["minify"], base.as_str());
    let help = ProjectionTarget::Help.render(&config, &[]);
    assert!(help.contains("powershell"));
}
