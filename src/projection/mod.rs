//! Text projections of a run configuration.
//!
//! Every function here is pure: it renders a [`CliConfig`] into the syntax of some
//! external tool and returns the text. Nothing is written or executed.

pub mod command;
pub mod deploy;
pub mod help;
pub mod pipelines;
pub mod scripts;

pub use command::*;
pub use deploy::*;
pub use help::*;
pub use pipelines::*;
pub use scripts::*;

use crate::core::models::CliConfig;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionTarget {
    /// Single shell command
    Cli,
    /// Shell script with one command per file
    Batch,
    /// package.json scripts table
    Npm,
    /// Makefile targets
    Make,
    /// gulpfile.js task
    Gulp,
    /// webpack plugin
    Webpack,
    /// GitHub Actions workflow
    Github,
    /// Dockerfile
    Docker,
    /// codeshrink.config.json
    Config,
    /// Flag reference
    Help,
}

impl ProjectionTarget {
    pub const ALL: [ProjectionTarget; 10] = [
        Self::Cli,
        Self::Batch,
        Self::Npm,
        Self::Make,
        Self::Gulp,
        Self::Webpack,
        Self::Github,
        Self::Docker,
        Self::Config,
        Self::Help,
    ];

    /// Render `config`. `files` is only used by the batch script.
    pub fn render(&self, config: &CliConfig, files: &[String]) -> String {
        match self {
            Self::Cli => generate_cli_command(config),
            Self::Batch => generate_batch_script(files, config),
            Self::Npm => generate_npm_scripts(config),
            Self::Make => generate_makefile(config),
            Self::Gulp => generate_gulp_task(config),
            Self::Webpack => generate_webpack_plugin(config),
            Self::Github => generate_github_workflow(config),
            Self::Docker => generate_dockerfile(config),
            Self::Config => generate_config_file(config),
            Self::Help => generate_help_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_target_renders_text() {
        let config = CliConfig::new("src/app.js");
        let files = vec!["src/app.js".to_string()];
        for target in ProjectionTarget::ALL {
            assert!(!target.render(&config, &files).trim().is_empty(), "{:?}", target);
        }
    }

    #[test]
    fn test_targets_parse_from_cli_names() {
        assert_eq!(
            ProjectionTarget::from_str("github", true),
            Ok(ProjectionTarget::Github)
        );
        assert!(ProjectionTarget::from_str("ant", true).is_err());
    }
}
