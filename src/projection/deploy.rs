use super::command::{cli_arguments, generate_cli_command, COMMAND_PREFIX};
use crate::core::models::CliConfig;
use crate::utils::config_loader::ConfigFile;

/// CI never watches
fn one_shot(config: &CliConfig) -> CliConfig {
    let mut once = config.clone();
    once.watch = false;
    once
}

/// GitHub Actions workflow that installs the tool, minifies and uploads the results
pub fn generate_github_workflow(config: &CliConfig) -> String {
    let artifact_path = config.output.clone().unwrap_or_else(|| "**/*.min.*".to_string());
    format!(
        r#"name: Minify

on:
  push:
    branches: [main]
  pull_request:

jobs:
  minify:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: dtolnay/rust-toolchain@stable
      - name: Install codeshrink
        run: cargo install codeshrink
      - name: Minify ({level})
        run: {command}
      - uses: actions/upload-artifact@v4
        with:
          name: minified
          path: "{artifact_path}"
"#,
        level = config.options.level,
        command = generate_cli_command(&one_shot(config)),
        artifact_path = artifact_path,
    )
}

/// Two-stage Dockerfile whose entrypoint is the tool and whose default arguments are `config`
pub fn generate_dockerfile(config: &CliConfig) -> String {
    let args = serde_json::to_string(&cli_arguments(&one_shot(config))).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"FROM rust:1-slim AS build
RUN cargo install codeshrink

FROM debian:bookworm-slim
COPY --from=build /usr/local/cargo/bin/{prefix} /usr/local/bin/{prefix}
WORKDIR /workspace
ENTRYPOINT ["{prefix}"]
CMD {args}
"#,
        prefix = COMMAND_PREFIX,
        args = args,
    )
}

/// `codeshrink.config.json` body; loads back through the config loader
pub fn generate_config_file(config: &CliConfig) -> String {
    serde_json::to_string_pretty(&ConfigFile::from(config)).unwrap_or_else(|_| "{}".to_string())
}
