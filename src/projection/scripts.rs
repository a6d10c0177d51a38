use super::command::generate_cli_command;
use crate::core::content::generate_minified_filename;
use crate::core::models::{CliConfig, MinificationLevel};
use serde_json::json;

/// Config with the level swapped, used for the derived script variants
fn variant(config: &CliConfig, level: Option<MinificationLevel>, watch: bool) -> String {
    let mut derived = config.clone();
    if let Some(level) = level {
        derived.options.level = level;
    }
    derived.watch = watch;
    generate_cli_command(&derived)
}

/// Where `file` goes in a batch run: under `output_dir` when given, else `name.min.ext` beside it
pub fn batch_output_path(file: &str, output_dir: Option<&str>) -> String {
    match output_dir {
        Some(dir) => {
            let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
            format!("{}/{}", dir.trim_end_matches(['/', '\\']), name)
        }
        None => generate_minified_filename(file),
    }
}

/// POSIX shell script with one command per file
pub fn generate_batch_script(files: &[String], config: &CliConfig) -> String {
    let mut script = String::from("#!/bin/sh\n# Generated by codeshrink\nset -e\n\n");
    for file in files {
        let mut per_file = config.clone();
        per_file.input = file.clone();
        per_file.output = Some(batch_output_path(file, config.output.as_deref()));
        per_file.recursive = false;
        per_file.watch = false;
        script.push_str(&generate_cli_command(&per_file));
        script.push('\n');
    }
    script
}

/// `package.json` scripts table: base command plus watch, aggressive and light variants
pub fn generate_npm_scripts(config: &CliConfig) -> String {
    let scripts = json!({
        "scripts": {
            "minify": variant(config, None, config.watch),
            "minify:watch": variant(config, None, true),
            "minify:aggressive": variant(config, Some(MinificationLevel::Aggressive), config.watch),
            "minify:light": variant(config, Some(MinificationLevel::Light), config.watch),
        }
    });
    serde_json::to_string_pretty(&scripts).unwrap_or_default()
}

/// Makefile with tab-indented recipes and a clean target for `*.min.*` outputs
pub fn generate_makefile(config: &CliConfig) -> String {
    let targets = [
        ("minify", variant(config, None, config.watch)),
        ("minify-watch", variant(config, None, true)),
        ("minify-aggressive", variant(config, Some(MinificationLevel::Aggressive), config.watch)),
        ("minify-light", variant(config, Some(MinificationLevel::Light), config.watch)),
    ];

    let mut makefile = String::from(
        ".PHONY: minify minify-watch minify-aggressive minify-light clean\n\n",
    );
    for (name, command) in targets {
        makefile.push_str(&format!("{}:\n\t{}\n\n", name, command));
    }
    makefile.push_str("clean:\n\tfind . -name \"*.min.*\" -type f -delete\n");
    makefile
}
