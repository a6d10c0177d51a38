use crate::core::models::{CliConfig, MinificationLevel, MinificationOptions, SupportedLanguage};
use crate::utils::{Logger, MinifyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "codeshrink.config.json";

/// Partial run configuration (codeshrink.config.json).
///
/// Every field is optional so a file, the command line and the defaults can be
/// layered on top of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<SupportedLanguage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<MinificationLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_comments: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_whitespace: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_empty_lines: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_line_breaks: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mangle_variables: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_console_log: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_debugger: Option<bool>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            MinifyError::config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
        })
    }

    /// Fields set in `self` win; the rest come from `lower`
    pub fn or(self, lower: ConfigFile) -> ConfigFile {
        ConfigFile {
            input: self.input.or(lower.input),
            output: self.output.or(lower.output),
            language: self.language.or(lower.language),
            level: self.level.or(lower.level),
            recursive: self.recursive.or(lower.recursive),
            watch: self.watch.or(lower.watch),
            remove_comments: self.remove_comments.or(lower.remove_comments),
            remove_whitespace: self.remove_whitespace.or(lower.remove_whitespace),
            remove_empty_lines: self.remove_empty_lines.or(lower.remove_empty_lines),
            preserve_line_breaks: self.preserve_line_breaks.or(lower.preserve_line_breaks),
            mangle_variables: self.mangle_variables.or(lower.mangle_variables),
            remove_console_log: self.remove_console_log.or(lower.remove_console_log),
            remove_debugger: self.remove_debugger.or(lower.remove_debugger),
        }
    }

    /// Fill whatever is still unset with the defaults
    pub fn resolve(self) -> CliConfig {
        let defaults = MinificationOptions::default();
        CliConfig {
            input: self.input.unwrap_or_default(),
            output: self.output,
            language: self.language,
            recursive: self.recursive.unwrap_or(false),
            watch: self.watch.unwrap_or(false),
            options: MinificationOptions {
                level: self.level.unwrap_or(defaults.level),
                remove_comments: self.remove_comments.unwrap_or(defaults.remove_comments),
                remove_whitespace: self.remove_whitespace.unwrap_or(defaults.remove_whitespace),
                remove_empty_lines: self.remove_empty_lines.unwrap_or(defaults.remove_empty_lines),
                preserve_line_breaks: self
                    .preserve_line_breaks
                    .unwrap_or(defaults.preserve_line_breaks),
                mangle_variables: self.mangle_variables.unwrap_or(defaults.mangle_variables),
                remove_console_log: self.remove_console_log.unwrap_or(defaults.remove_console_log),
                remove_debugger: self.remove_debugger.unwrap_or(defaults.remove_debugger),
            },
        }
    }
}

impl From<&CliConfig> for ConfigFile {
    fn from(config: &CliConfig) -> Self {
        let options = &config.options;
        ConfigFile {
            input: Some(config.input.clone()),
            output: config.output.clone(),
            language: config.language,
            level: Some(options.level),
            recursive: Some(config.recursive),
            watch: Some(config.watch),
            remove_comments: Some(options.remove_comments),
            remove_whitespace: Some(options.remove_whitespace),
            remove_empty_lines: Some(options.remove_empty_lines),
            preserve_line_breaks: Some(options.preserve_line_breaks),
            mangle_variables: Some(options.mangle_variables),
            remove_console_log: Some(options.remove_console_log),
            remove_debugger: Some(options.remove_debugger),
        }
    }
}

/// Config loader that supports config files with CLI override
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `explicit` when given (it must exist), otherwise look for
    /// codeshrink.config.json in `root`.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Option<ConfigFile>> {
        let config_path = match explicit {
            Some(path) if !path.exists() => {
                return Err(MinifyError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => root.join(CONFIG_FILE_NAME),
        };

        if !config_path.exists() {
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
            return Ok(None);
        }

        Logger::debug(&format!("Loading config from {}", config_path.display()));
        let content = std::fs::read_to_string(&config_path)?;
        ConfigFile::parse(&content).map(Some)
    }

    /// CLI > config file > default
    pub fn merge_with_cli(file_config: Option<ConfigFile>, cli: ConfigFile) -> CliConfig {
        cli.or(file_config.unwrap_or_default()).resolve()
    }
}
