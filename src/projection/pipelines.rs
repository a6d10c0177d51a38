// Build-tool integration templates (gulp task, webpack plugin)

use super::command::generate_cli_command;
use crate::core::models::CliConfig;

/// Resolved options as a pretty JSON object, indented for embedding at `indent` spaces
fn options_literal(config: &CliConfig, indent: usize) -> String {
    let pretty = serde_json::to_string_pretty(&config.options).unwrap_or_else(|_| "{}".to_string());
    let pad = " ".repeat(indent);
    pretty
        .lines()
        .enumerate()
        .map(|(i, line)| if i == 0 { line.to_string() } else { format!("{}{}", pad, line) })
        .collect::<Vec<_>>()
        .join("\n")
}

fn single_quoted(command: &str) -> String {
    format!("'{}'", command.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Glob the watcher should follow for `input`
fn watch_glob(config: &CliConfig) -> String {
    let input = config.input.trim_end_matches('/');
    let has_extension = input
        .rsplit('/')
        .next()
        .map(|name| name.contains('.'))
        .unwrap_or(false);
    if has_extension || input.is_empty() {
        input.to_string()
    } else if config.recursive {
        format!("{}/**/*", input)
    } else {
        format!("{}/*", input)
    }
}

/// gulpfile.js with a minify task and a watch task chained after it
pub fn generate_gulp_task(config: &CliConfig) -> String {
    let mut once = config.clone();
    once.watch = false;
    let command = single_quoted(&generate_cli_command(&once));

    format!(
        r#"const {{ watch, series }} = require('gulp');
const {{ exec }} = require('child_process');

// Resolved codeshrink options
const options = {options};

function minify(cb) {{
  exec({command}, (err, stdout, stderr) => {{
    if (stdout) process.stdout.write(stdout);
    if (stderr) process.stderr.write(stderr);
    cb(err);
  }});
}}

function watchSources() {{
  watch({glob}, {{ ignored: '**/*.min.*' }}, minify);
}}

exports.minify = minify;
exports.watch = series(minify, watchSources);
exports.default = minify;
"#,
        options = options_literal(config, 0),
        command = command,
        glob = single_quoted(&watch_glob(config)),
    )
}

/// webpack.config.js fragment with a plugin that runs after every emit, including watch rebuilds
pub fn generate_webpack_plugin(config: &CliConfig) -> String {
    let mut once = config.clone();
    once.watch = false;
    let command = single_quoted(&generate_cli_command(&once));

    format!(
        r#"const {{ execSync }} = require('child_process');

class CodeshrinkPlugin {{
  constructor(overrides = {{}}) {{
    this.options = {{ ...{options}, ...overrides }};
  }}

  apply(compiler) {{
    compiler.hooks.afterEmit.tap('CodeshrinkPlugin', () => {{
      execSync({command}, {{ stdio: 'inherit' }});
    }});
    compiler.hooks.watchRun.tap('CodeshrinkPlugin', () => {{
      console.log('[codeshrink] change detected, re-minifying after emit');
    }});
  }}
}}

module.exports = {{
  plugins: [new CodeshrinkPlugin()],
  watchOptions: {{
    ignored: ['**/node_modules', '**/*.min.*'],
  }},
}};
"#,
        options = options_literal(config, 4),
        command = command,
    )
}
