use super::command::COMMAND_PREFIX;
use crate::core::models::SupportedLanguage;

const FLAGS: &[(&str, &str, &str)] = &[
    ("-i, --input <PATH>", "File or directory to minify", "--input \"src/app.js\""),
    ("-o, --output <PATH>", "Output file, or directory for directory input", "--output \"dist\""),
    ("-l, --level <LEVEL>", "light | moderate | aggressive (default: moderate)", "--level aggressive"),
    ("-L, --language <LANG>", "Override language detection", "--language css"),
    ("-r, --recursive", "Descend into subdirectories", "--input \"src\" --recursive"),
    ("-w, --watch", "Re-minify when sources change", "--input \"src\" --watch"),
    ("-c, --config <FILE>", "Read options from a JSON config file", "--config codeshrink.config.json"),
    ("    --keep-comments", "Do not strip comments", "--keep-comments"),
    ("    --keep-whitespace", "Do not collapse whitespace", "--keep-whitespace"),
    ("    --mangle-variables", "Shorten declared names (aggressive only, unsafe)", "--level aggressive --mangle-variables"),
    ("    --remove-console", "Drop console.* calls", "--remove-console"),
    ("    --keep-debugger", "Keep debugger statements", "--keep-debugger"),
    ("    --preserve-linebreaks", "Keep line structure while collapsing spaces", "--preserve-linebreaks"),
    ("    --keep-empty-lines", "Do not remove blank lines", "--keep-empty-lines"),
];

/// Static reference text: usage, every flag with an example, supported languages
pub fn generate_help_text() -> String {
    let mut help = format!(
        "{prefix} - multi-language code minifier\n\nUSAGE:\n    {prefix} --input <PATH> [OPTIONS]\n    {prefix} generate <TARGET> --input <PATH> [OPTIONS]\n    {prefix} detect <FILE>\n    {prefix} worker\n\nOPTIONS:\n",
        prefix = COMMAND_PREFIX
    );
    for (flag, description, _) in FLAGS {
        help.push_str(&format!("    {:<28}{}\n", flag, description));
    }

    help.push_str("\nEXAMPLES:\n");
    for (_, _, example) in FLAGS {
        help.push_str(&format!("    {} {}\n", COMMAND_PREFIX, example));
    }

    help.push_str("\nSUPPORTED LANGUAGES:\n");
    let names: Vec<&str> = SupportedLanguage::ALL.iter().map(|lang| lang.as_str()).collect();
    for row in names.chunks(8) {
        help.push_str(&format!("    {}\n", row.join(", ")));
    }
    help
}
