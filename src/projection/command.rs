use crate::core::models::{CliConfig, MinificationLevel, MinificationOptions};

/// Invocation every generated command starts with
pub const COMMAND_PREFIX: &str = "codeshrink";

/// One command-line argument in its fixed position
#[derive(Debug, Clone, PartialEq, Eq)]
enum CliArg {
    /// Value that is always quoted in shell text
    Path(&'static str, String),
    Value(&'static str, String),
    Flag(&'static str),
}

fn arguments(config: &CliConfig) -> Vec<CliArg> {
    let mut args = vec![CliArg::Path("--input", config.input.clone())];
    if let Some(output) = &config.output {
        args.push(CliArg::Path("--output", output.clone()));
    }
    if let Some(language) = config.language {
        args.push(CliArg::Value("--language", language.as_str().to_string()));
    }
    if config.options.level != MinificationLevel::default() {
        args.push(CliArg::Value("--level", config.options.level.as_str().to_string()));
    }
    if config.recursive {
        args.push(CliArg::Flag("--recursive"));
    }
    if config.watch {
        args.push(CliArg::Flag("--watch"));
    }
    args.extend(option_flags(&config.options).into_iter().map(CliArg::Flag));
    args
}

/// Flags for every option that differs from its default, in fixed order
pub fn option_flags(options: &MinificationOptions) -> Vec<&'static str> {
    let defaults = MinificationOptions::default();
    [
        (options.remove_comments != defaults.remove_comments, "--keep-comments"),
        (options.remove_whitespace != defaults.remove_whitespace, "--keep-whitespace"),
        (options.mangle_variables != defaults.mangle_variables, "--mangle-variables"),
        (options.remove_console_log != defaults.remove_console_log, "--remove-console"),
        (options.remove_debugger != defaults.remove_debugger, "--keep-debugger"),
        (options.preserve_line_breaks != defaults.preserve_line_breaks, "--preserve-linebreaks"),
        (options.remove_empty_lines != defaults.remove_empty_lines, "--keep-empty-lines"),
    ]
    .into_iter()
    .filter_map(|(diverges, flag)| diverges.then_some(flag))
    .collect()
}

/// Shell command for `config`, e.g. `codeshrink --input "app.js" --level aggressive`
pub fn generate_cli_command(config: &CliConfig) -> String {
    let mut command = String::from(COMMAND_PREFIX);
    for arg in arguments(config) {
        command.push(' ');
        match arg {
            CliArg::Path(flag, value) => {
                command.push_str(&format!("{} \"{}\"", flag, escape_double_quoted(&value)))
            }
            CliArg::Value(flag, value) => command.push_str(&format!("{} {}", flag, value)),
            CliArg::Flag(flag) => command.push_str(flag),
        }
    }
    command
}

/// The same arguments as [`generate_cli_command`], unquoted, without the prefix
pub fn cli_arguments(config: &CliConfig) -> Vec<String> {
    let mut flat = Vec::new();
    for arg in arguments(config) {
        match arg {
            CliArg::Path(flag, value) | CliArg::Value(flag, value) => {
                flat.push(flag.to_string());
                flat.push(value);
            }
            CliArg::Flag(flag) => flat.push(flag.to_string()),
        }
    }
    flat
}

fn escape_double_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::SupportedLanguage;

    #[test]
    fn test_level_only_when_not_default() {
        let aggressive = CliConfig::new("app.js").with_level(MinificationLevel::Aggressive);
        let command = generate_cli_command(&aggressive);
        assert!(command.contains("--input \"app.js\""));
        assert!(command.contains("--level aggressive"));

        let moderate = CliConfig::new("app.js").with_level(MinificationLevel::Moderate);
        assert!(!generate_cli_command(&moderate).contains("--level"));
    }

    #[test]
    fn test_empty_input_is_still_quoted() {
        assert_eq!(generate_cli_command(&CliConfig::default()), "codeshrink --input \"\"");
    }

    #[test]
    fn test_flag_order_is_fixed() {
        let mut config = CliConfig::new("src")
            .with_output("dist")
            .with_level(MinificationLevel::Light);
        config.language = Some(SupportedLanguage::Css);
        config.recursive = true;
        config.watch = true;
        config.options.remove_comments = false;
        config.options.remove_whitespace = false;
        config.options.mangle_variables = true;
        config.options.remove_console_log = true;
        config.options.remove_debugger = false;
        config.options.preserve_line_breaks = true;
        config.options.remove_empty_lines = false;

        assert_eq!(
            generate_cli_command(&config),
            "codeshrink --input \"src\" --output \"dist\" --language css --level light \
             --recursive --watch --keep-comments --keep-whitespace --mangle-variables \
             --remove-console --keep-debugger --preserve-linebreaks --keep-empty-lines"
        );
    }

    #[test]
    fn test_paths_are_escaped() {
        let command = generate_cli_command(&CliConfig::new("my \"dir\"/$HOME.js"));
        assert!(command.contains(r#"--input "my \"dir\"/\$HOME.js""#));
    }

    #[test]
    fn test_arguments_are_unquoted() {
        let config = CliConfig::new("a b.js").with_output("out.js");
        assert_eq!(cli_arguments(&config), vec!["--input", "a b.js", "--output", "out.js"]);
    }
}
