use super::literals::{strip_comment, Lexer, ProtectedText, QUOTED};
use super::rules::{rewrite_rule, Pipeline, EMPTY_LINES, TRIM, TRIM_LINES, COLLAPSE_HORIZONTAL};
use super::{guarded, Transformed};
use crate::core::models::{MinificationLevel, MinificationOptions, MinificationResult};
use crate::utils::MinifyError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

// A `/` opens a regex literal only where an expression may start
const REGEX_LITERAL: &str = r"(?:[(,=:\[!&|?{};]|(?m:^)|\b(?:return|typeof|instanceof|in|of|new|delete|void|throw|case|do|else|yield|await))[ \t\r\n]*(?P<lit_regex>/(?:[^/\\\n\[*]|\\[^\n]|\[(?:[^\]\\\n]|\\[^\n])*\])(?:[^/\\\n\[]|\\[^\n]|\[(?:[^\]\\\n]|\\[^\n])*\])*/[A-Za-z]*)";

static SCRIPT_LEXER: Lazy<Lexer> = Lazy::new(|| {
    Lexer::new(
        &format!(
            r"(?P<comment>/\*[\s\S]*?\*/|//[^\n]*(?:\n[ \t]*)?)|{}|`(?:[^`\\]|\\[\s\S])*`|{}",
            QUOTED, REGEX_LITERAL
        ),
        strip_comment,
    )
});

rewrite_rule!(
    pub JS_CONSOLE_CALL = "js-console-call",
    r"\bconsole\s*\.\s*[A-Za-z_$][\w$]*\s*\((?:[^()]|\((?:[^()]|\([^()]*\))*\))*\)\s*;?",
    ""
);
rewrite_rule!(pub JS_DEBUGGER = "js-debugger", r"\bdebugger\b\s*;?", "");
// Newlines survive between tokens so automatic semicolon insertion still works
rewrite_rule!(pub JS_NEWLINE_RUNS = "js-newline-runs", r"[ \t\r\f]*\n\s*", "\n");
rewrite_rule!(pub JS_PUNCTUATION = "js-punctuation", r"[ \n]*([{}()\[\];,:=])[ \n]*", "$1");
rewrite_rule!(pub JS_PUNCTUATION_INLINE = "js-punctuation-inline", r"[ \t]*([{}()\[\];,:=])[ \t]*", "$1");
rewrite_rule!(pub JS_SEMICOLON_BRACE = "js-semicolon-brace", r";+\s*\}", "}");

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:var|let|const|function|class)\s+([A-Za-z_$][\w$]*)").unwrap()
});

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_$][\w$]*").unwrap());

const RESERVED: &[&str] = &[
    "as", "do", "if", "in", "is", "of", "for", "let", "new", "try", "var", "case", "else",
    "enum", "eval", "null", "this", "true", "void", "with", "break", "catch", "class", "const",
    "false", "super", "throw", "while", "yield", "delete", "export", "import", "public",
    "return", "static", "switch", "typeof", "default", "extends", "finally", "package",
    "private", "continue", "debugger", "function", "arguments", "interface", "protected",
    "implements", "instanceof", "undefined",
];

/// Rule pipeline applied to scanned JS/TS; comments are already gone
pub fn script_pipeline(options: &MinificationOptions) -> Pipeline {
    let mut pipeline = Pipeline::new();
    pipeline
        .push_if(options.remove_console_log, &JS_CONSOLE_CALL)
        .push_if(options.remove_debugger, &JS_DEBUGGER);

    let tighten = options.level >= MinificationLevel::Moderate;
    if options.remove_whitespace {
        if options.preserve_line_breaks {
            pipeline
                .push(&COLLAPSE_HORIZONTAL)
                .push(&TRIM_LINES)
                .push_if(tighten, &JS_PUNCTUATION_INLINE);
        } else {
            pipeline
                .push(&JS_NEWLINE_RUNS)
                .push(&COLLAPSE_HORIZONTAL)
                .push_if(tighten, &JS_PUNCTUATION);
        }
    }
    pipeline
        .push_if(options.remove_empty_lines, &EMPTY_LINES)
        .push_if(options.is_aggressive(), &JS_SEMICOLON_BRACE)
        .push(&TRIM);
    pipeline
}

/// Minify JavaScript or TypeScript
pub fn minify_js(content: &str, options: &MinificationOptions) -> MinificationResult {
    guarded("JavaScript", content, options, |content, options| {
        let protected = ProtectedText::scan(content, &SCRIPT_LEXER, options.remove_comments)?;
        check_scanned(protected.text())?;
        let mut code = script_pipeline(options).run(protected.text());

        let mut transformed = Transformed::default();

        if options.mangles() {
            let report = mangle_identifiers(&code);
            code = report.code;
            transformed.warn(format!(
                "Variable mangling renamed {} identifier(s); it ignores scope and is unsafe for code with shadowing or dynamic property access",
                report.renamed.len()
            ));
        } else if options.mangle_variables {
            transformed.warn("mangleVariables is only applied at the aggressive level");
        }

        transformed.code = protected.restore(&code);
        Ok(transformed)
    })
}

/// Quotes or comment openers left outside every literal mean the scan lost
/// track of where strings end; rewriting from there could eat real code.
fn check_scanned(text: &str) -> crate::utils::Result<()> {
    if let Some(quote) = text.chars().find(|c| matches!(c, '"' | '\'' | '`')) {
        return Err(MinifyError::UnsafeInput(format!("unterminated {} literal", quote)));
    }
    if text.contains("/*") {
        return Err(MinifyError::UnsafeInput("unterminated block comment".to_string()));
    }
    Ok(())
}

/// Outcome of a mangling pass
#[derive(Debug, Clone, Default)]
pub struct MangleReport {
    pub code: String,
    /// Original name to alias, in order of first declaration
    pub renamed: Vec<(String, String)>,
}

/// Best-effort identifier shortening.
///
/// Renames names that directly follow `var`/`let`/`const`/`function`/`class`
/// to base-26 aliases (`a`, `b`, ..., `z`, `aa`, ...), skipping aliases that
/// already appear in the code or are reserved words. Scope is ignored and
/// property accesses (`obj.name`) are left alone; shadowed names and dynamic
/// lookups can break.
pub fn mangle_identifiers(code: &str) -> MangleReport {
    let existing: HashSet<&str> = IDENTIFIER.find_iter(code).map(|m| m.as_str()).collect();

    let mut mapping: HashMap<String, String> = HashMap::new();
    let mut renamed = Vec::new();
    let mut counter = 0usize;

    for caps in DECLARATION.captures_iter(code) {
        let name = &caps[1];
        if mapping.contains_key(name) {
            continue;
        }
        let alias = loop {
            let candidate = base26(counter);
            counter += 1;
            if !existing.contains(candidate.as_str()) && !RESERVED.contains(&candidate.as_str()) {
                break candidate;
            }
        };
        if alias.len() >= name.len() {
            continue;
        }
        mapping.insert(name.to_string(), alias.clone());
        renamed.push((name.to_string(), alias));
    }

    if mapping.is_empty() {
        return MangleReport {
            code: code.to_string(),
            renamed,
        };
    }

    let mut output = String::with_capacity(code.len());
    let mut last = 0;
    for m in IDENTIFIER.find_iter(code) {
        let preceding = code[..m.start()].chars().next_back();
        let is_property = preceding == Some('.');
        let is_fragment = preceding.is_some_and(super::rules::is_identifier_char);
        if is_property || is_fragment {
            continue;
        }
        if let Some(alias) = mapping.get(m.as_str()) {
            output.push_str(&code[last..m.start()]);
            output.push_str(alias);
            last = m.end();
        }
    }
    output.push_str(&code[last..]);

    MangleReport {
        code: output,
        renamed,
    }
}

/// 0 -> a, 25 -> z, 26 -> aa, 27 -> ab, ...
pub fn base26(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'a' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggressive() -> MinificationOptions {
        MinificationOptions::default().with_level(MinificationLevel::Aggressive)
    }

    #[test]
    fn test_removes_comments_and_whitespace() {
        let source = "// header\nfunction add(a, b) {\n  /* sum */\n  return a + b;\n}\n";
        let result = minify_js(source, &MinificationOptions::default());
        assert_eq!(result.minified, "function add(a,b){return a + b;}");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_strings_are_untouched() {
        let source = "const s = \"a  //  b\";\nconst t = 'x /* y */';";
        let result = minify_js(source, &MinificationOptions::default());
        assert!(result.minified.contains("\"a  //  b\""));
        assert!(result.minified.contains("'x /* y */'"));
    }

    #[test]
    fn test_console_removal_is_opt_in() {
        let source = "console.log('hi', fn(1));\nrun();";
        let kept = minify_js(source, &MinificationOptions::default());
        assert!(kept.minified.contains("console.log"));

        let options = MinificationOptions {
            remove_console_log: true,
            ..Default::default()
        };
        let removed = minify_js(source, &options);
        assert_eq!(removed.minified, "run();");
    }

    #[test]
    fn test_debugger_removed_by_default() {
        let result = minify_js("debugger;\nstart();", &MinificationOptions::default());
        assert_eq!(result.minified, "start();");

        let options = MinificationOptions {
            remove_debugger: false,
            ..Default::default()
        };
        assert!(minify_js("debugger;", &options).minified.contains("debugger"));
    }

    #[test]
    fn test_newlines_kept_between_statements_without_semicolons() {
        let result = minify_js("let a = 1\nlet b = 2\n", &MinificationOptions::default());
        assert_eq!(result.minified, "let a=1\nlet b=2");
    }

    #[test]
    fn test_aggressive_drops_semicolon_before_brace() {
        let result = minify_js("function f() { return 1; }", &aggressive());
        assert_eq!(result.minified, "function f(){return 1}");
    }

    #[test]
    fn test_light_level_skips_punctuation() {
        let options = MinificationOptions::default().with_level(MinificationLevel::Light);
        let result = minify_js("if (x) {  go( 1 );  }", &options);
        assert_eq!(result.minified, "if (x) { go( 1 ); }");
    }

    #[test]
    fn test_preserve_line_breaks() {
        let options = MinificationOptions {
            preserve_line_breaks: true,
            ..Default::default()
        };
        let result = minify_js("  a = 1;\n\n  b = 2;\n", &options);
        assert_eq!(result.minified, "a=1;\nb=2;");
    }

    #[test]
    fn test_mangle_requires_aggressive_and_warns() {
        let source = "const counter = 1; counter += 1;";
        let moderate = MinificationOptions {
            mangle_variables: true,
            ..Default::default()
        };
        let result = minify_js(source, &moderate);
        assert!(result.minified.contains("counter"));
        assert_eq!(result.warnings.len(), 1);

        let options = MinificationOptions {
            mangle_variables: true,
            ..aggressive()
        };
        let result = minify_js(source, &options);
        assert!(!result.minified.contains("counter"));
        assert!(result.warnings.iter().any(|w| w.contains("unsafe")));
    }

    #[test]
    fn test_mangle_skips_properties_and_existing_names() {
        let report = mangle_identifiers("let value=1;let a=2;obj.value=value+a;");
        assert_eq!(report.renamed, vec![("value".to_string(), "b".to_string())]);
        assert_eq!(report.code, "let b=1;let a=2;obj.value=b+a;");
    }

    #[test]
    fn test_mangle_leaves_strings_alone() {
        let options = MinificationOptions {
            mangle_variables: true,
            ..aggressive()
        };
        let result = minify_js("const total = 1; log(\"total\", total);", &options);
        assert!(result.minified.contains("\"total\""));
        assert!(result.minified.contains("const a=1"));
    }

    #[test]
    fn test_base26_sequence() {
        assert_eq!(base26(0), "a");
        assert_eq!(base26(25), "z");
        assert_eq!(base26(26), "aa");
        assert_eq!(base26(27), "ab");
        assert_eq!(base26(701), "zz");
        assert_eq!(base26(702), "aaa");
    }

    #[test]
    fn test_second_pass_does_not_grow() {
        let options = MinificationOptions {
            remove_console_log: true,
            ..Default::default()
        };
        let source = "function f(x) {\n  console.log(x);\n  debugger;\n  return x * 2;\n}\n";
        let once = minify_js(source, &options);
        let twice = minify_js(&once.minified, &options);
        assert!(twice.minified.len() <= once.minified.len());
        assert!(!twice.minified.contains("console.log"));
        assert!(!twice.minified.contains("debugger"));
    }

    #[test]
    fn test_quotes_inside_comments_do_not_open_strings() {
        let options = MinificationOptions::default();
        let result = minify_js("/* it's */ x = 'a'; /* end */ y = 1;", &options);
        assert_eq!(result.minified, "x='a';y=1;");

        let result = minify_js("// press the ` key\nconst a = 1;\nconst b = `x`;", &options);
        assert_eq!(result.minified, "const a=1;const b=`x`;");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_regex_literals_are_protected() {
        let result = minify_js("const parts = url.split(/\\/\\//); run();", &MinificationOptions::default());
        assert_eq!(result.minified, "const parts=url.split(/\\/\\//);run();");

        let result = minify_js("if (/['\"]/.test(s)) go(); // q", &MinificationOptions::default());
        assert_eq!(result.minified, "if(/['\"]/.test(s))go();");
    }

    #[test]
    fn test_division_is_not_a_regex() {
        let result = minify_js("x = a / b / c; // it's", &MinificationOptions::default());
        assert_eq!(result.minified, "x=a / b / c;");
    }

    #[test]
    fn test_unterminated_string_returns_original() {
        let source = "const s = \"abc\nrun(); // done";
        let result = minify_js(source, &MinificationOptions::default());
        assert_eq!(result.minified, source);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("unterminated"));
    }

    #[test]
    fn test_kept_line_comment_keeps_its_line_break() {
        let options = MinificationOptions {
            remove_comments: false,
            ..Default::default()
        };
        let result = minify_js("a = 1; // don't\nb = 2;", &options);
        assert_eq!(result.minified, "a=1;// don't\nb=2;");
    }
}
