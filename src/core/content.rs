//! Content intelligence: language detection, pre-flight validation and size helpers.
//!
//! Everything here is heuristic. Detection and validation look at text
//! patterns only and never build a syntax tree.

use crate::core::engine::literals::{strip_comment, Lexer, ProtectedText, QUOTED};
use crate::core::models::{CommentStyle, CompressionStats, FileValidationResult, SupportedLanguage};
use crate::utils::{MinifyError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Files above this size are rejected before minification
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Opening tags may outnumber closing tags by this much before HTML validation warns
const UNCLOSED_TAG_ALLOWANCE: usize = 5;

/// Share of the input the estimate will never exceed
const MAX_POTENTIAL: f64 = 80.0;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Words that start a code block, never a CSS selector
const NON_SELECTOR_KEYWORDS: &[&str] = &[
    "class", "interface", "type", "enum", "function", "const", "let", "var", "if", "else",
    "for", "while", "switch", "return", "export", "import", "def", "fn", "func", "struct",
];

static HTML_CLOSING_ROOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</html\s*>").unwrap());
static XML_OPENING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<([A-Za-z_][\w:.\-]*)(?:\s[^>]*)?>").unwrap());
static XML_CLOSING: Lazy<Regex> = Lazy::new(|| Regex::new(r"</([A-Za-z_][\w:.\-]*)\s*>$").unwrap());
static XML_SELF_CLOSED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<[A-Za-z_][\w:.\-]*(?:\s[^>]*)?/>$").unwrap());
static CSS_AT_RULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*@(?:media|import|charset|keyframes|font-face|supports)\b").unwrap()
});
static CSS_RULE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^{};]*)\{([^{}]*)").unwrap());
static CSS_BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)").unwrap());
static CSS_SELECTOR_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\-.#*:>+~,\s%]+$").unwrap());
static CSS_DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[;\s])-?[A-Za-z][\w-]*\s*:\s*[^:=;{}\s]").unwrap());
static JS_DECLARATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:function|const|let|var)\b|=>").unwrap());
static TS_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\binterface\s+[A-Za-z_$][\w$]*\s*(?:<[^>]*>)?\s*(?:extends\b[^{]*)?\{",
        r"|\btype\s+[A-Za-z_$][\w$]*\s*(?:<[^>]*>)?\s*=",
        r"|\benum\s+[A-Za-z_$][\w$]*\s*\{",
        r"|[\w$)\]]\s*\??:\s*(?:string|number|boolean|any|void|unknown|never|Record<|Array<|Promise<)",
        r"|\bas\s+const\b",
    ))
    .unwrap()
});
static PYTHON_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^\s*(?:def\s+\w+\s*\(|import\s+\w|from\s+[\w.]+\s+import\b|class\s+\w+[^{\n]*:\s*$)",
        r#"|__name__\s*==\s*['"]__main__['"]"#,
    ))
    .unwrap()
});

static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!--[\s\S]*?-->").unwrap());
static HTML_RAW_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap()
});
static HTML_OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Za-z][\w\-]*)\b[^>]*?(/?)>").unwrap());
static HTML_CLOSE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</[A-Za-z][\w\-]*\s*>").unwrap());
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\n]*").unwrap());
static HASH_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(?:^|[ \t])#[^\n]*").unwrap());
static DASH_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"--[^\n]*").unwrap());
static PERCENT_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"%[^\n]*").unwrap());
static POWERSHELL_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<#[\s\S]*?#>").unwrap());

/// Guess the language of `content`.
///
/// Rules are tried in a fixed order and the first match wins: HTML, JSON, XML,
/// CSS, TypeScript/JavaScript, PHP, Python. Anything else is JavaScript.
pub fn detect_language(content: &str) -> SupportedLanguage {
    let trimmed = content.trim();
    let head: String = trimmed.chars().take(64).collect::<String>().to_lowercase();

    if head.starts_with("<!doctype html") || head.starts_with("<html") || HTML_CLOSING_ROOT.is_match(trimmed) {
        return SupportedLanguage::Html;
    }
    if looks_like_json(trimmed) {
        return SupportedLanguage::Json;
    }
    if head.starts_with("<?xml") || is_single_element(trimmed) {
        return SupportedLanguage::Xml;
    }
    if looks_like_css(trimmed) {
        return SupportedLanguage::Css;
    }
    if TS_MARKER.is_match(trimmed) {
        return SupportedLanguage::Typescript;
    }
    if JS_DECLARATION.is_match(trimmed) {
        return SupportedLanguage::Javascript;
    }
    if trimmed.contains("<?php") {
        return SupportedLanguage::Php;
    }
    if PYTHON_MARKER.is_match(trimmed) {
        return SupportedLanguage::Python;
    }
    SupportedLanguage::Javascript
}

/// Prefer the file extension, fall back to sniffing the content
pub fn detect_language_for_path(path: &Path, content: &str) -> SupportedLanguage {
    SupportedLanguage::from_path(path).unwrap_or_else(|| detect_language(content))
}

fn looks_like_json(trimmed: &str) -> bool {
    let delimited = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    delimited && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
}

/// One element wrapping the whole text: `<a ...>...</a>` or `<a .../>`
fn is_single_element(trimmed: &str) -> bool {
    if XML_SELF_CLOSED.is_match(trimmed) {
        return true;
    }
    match (XML_OPENING.captures(trimmed), XML_CLOSING.captures(trimmed)) {
        (Some(open), Some(close)) => open[1] == close[1],
        _ => false,
    }
}

fn looks_like_css(trimmed: &str) -> bool {
    if CSS_AT_RULE.is_match(trimmed) {
        return true;
    }
    let uncommented = BLOCK_COMMENT.replace_all(trimmed, " ");
    CSS_RULE_BLOCK.captures_iter(&uncommented).any(|caps| {
        let selector = caps[1].lines().last().unwrap_or_default().trim();
        is_selector(selector) && CSS_DECLARATION.is_match(&caps[2])
    })
}

fn is_selector(selector: &str) -> bool {
    if selector.is_empty() {
        return false;
    }
    let first_word = selector
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    if NON_SELECTOR_KEYWORDS.contains(&first_word) {
        return false;
    }
    let flattened = CSS_BRACKETED.replace_all(selector, "");
    CSS_SELECTOR_CHARS.is_match(&flattened)
}

/// Reject files that are empty or larger than [`MAX_FILE_SIZE`]. Returns the size.
pub fn validate_file(path: &Path) -> Result<u64> {
    let size = std::fs::metadata(path)?.len();
    validate_file_size(path, size)?;
    Ok(size)
}

pub fn validate_file_size(path: &Path, size: u64) -> Result<()> {
    if size == 0 {
        return Err(MinifyError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    if size > MAX_FILE_SIZE {
        return Err(MinifyError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

/// Structural sanity checks ahead of minification
pub fn validate_content(content: &str, language: SupportedLanguage) -> FileValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match language {
        SupportedLanguage::Json => {
            if let Err(e) = serde_json::from_str::<serde_json::Value>(content) {
                errors.push(MinifyError::invalid_json(&e, content).to_string());
            }
        }
        SupportedLanguage::Html => {
            let without_comments = HTML_COMMENT.replace_all(content, "");
            let markup = HTML_RAW_TEXT.replace_all(&without_comments, "<x></x>");
            let opening = HTML_OPEN_TAG
                .captures_iter(&markup)
                .filter(|caps| {
                    let name = caps[1].to_lowercase();
                    caps[2].is_empty() && !VOID_ELEMENTS.contains(&name.as_str())
                })
                .count();
            let closing = HTML_CLOSE_TAG.find_iter(&markup).count();
            if opening > closing + UNCLOSED_TAG_ALLOWANCE {
                warnings.push(format!(
                    "Possible unclosed HTML tags: {} opening vs {} closing",
                    opening, closing
                ));
            }
        }
        SupportedLanguage::Css => {
            let code = code_only(content);
            let (open, close) = (code.matches('{').count(), code.matches('}').count());
            if open != close {
                errors.push(format!("Mismatched braces: {} '{{' vs {} '}}'", open, close));
            }
        }
        SupportedLanguage::Javascript | SupportedLanguage::Typescript => {
            let code = code_only(content);
            let (open, close) = (code.matches('(').count(), code.matches(')').count());
            if open != close {
                warnings.push(format!("Mismatched parentheses: {} '(' vs {} ')'", open, close));
            }
        }
        _ => {}
    }

    FileValidationResult::from_findings(errors, warnings)
}

static CODE_LEXER: Lazy<Lexer> = Lazy::new(|| {
    Lexer::new(
        &format!(r"(?P<comment>/\*[\s\S]*?\*/|//[^\n]*)|{}", QUOTED),
        strip_comment,
    )
});

/// Text with strings and C-style comments blanked out, for delimiter counting
fn code_only(content: &str) -> String {
    ProtectedText::scan(content, &CODE_LEXER, true)
        .map(|protected| protected.text().to_string())
        .unwrap_or_else(|_| content.to_string())
}

/// Rough share of removable bytes, 0 to 80 percent:
/// `(whitespace * 0.8 + comment bytes) / total`.
pub fn estimate_minification_potential(content: &str, language: SupportedLanguage) -> u32 {
    if content.is_empty() {
        return 0;
    }
    let total = content.len() as f64;
    let whitespace = content.bytes().filter(u8::is_ascii_whitespace).count() as f64;
    let comments = comment_bytes(content, language.comment_style()) as f64;

    let estimate = (whitespace * 0.8 + comments) / total * 100.0;
    estimate.min(MAX_POTENTIAL).round() as u32
}

fn comment_bytes(content: &str, style: CommentStyle) -> usize {
    let patterns: Vec<&Regex> = match style {
        CommentStyle::Markup => vec![&*HTML_COMMENT],
        CommentStyle::CFamily => vec![&*BLOCK_COMMENT, &*LINE_COMMENT],
        CommentStyle::Php => vec![&*BLOCK_COMMENT, &*LINE_COMMENT, &*HASH_COMMENT],
        CommentStyle::Hash => vec![&*HASH_COMMENT],
        CommentStyle::PowerShell => vec![&*POWERSHELL_BLOCK, &*HASH_COMMENT],
        CommentStyle::Sql => vec![&*BLOCK_COMMENT, &*DASH_COMMENT],
        CommentStyle::Matlab => vec![&*PERCENT_COMMENT],
        CommentStyle::None => Vec::new(),
    };
    patterns
        .into_iter()
        .map(|pattern| pattern.find_iter(content).map(|m| m.len()).sum::<usize>())
        .sum()
}

/// Human readable size with binary prefixes: `512 B`, `1 KB`, `1.5 KB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.1}", value);
    let rounded = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{} {}", rounded, UNITS[unit])
}

pub fn calculate_savings(original_size: u64, minified_size: u64) -> CompressionStats {
    CompressionStats::new(original_size, minified_size)
}

/// Lowercased final extension of the file name, without the dot; empty when there is none
pub fn get_file_extension(filename: &str) -> String {
    let base = basename(filename);
    match base.rfind('.') {
        Some(index) if index > 0 => base[index + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// `app.js` -> `app.min.js`, `Makefile` -> `Makefile.min`
pub fn generate_minified_filename(filename: &str) -> String {
    let dir_len = filename.len() - basename(filename).len();
    let base = &filename[dir_len..];
    match base.rfind('.') {
        Some(index) if index > 0 => format!(
            "{}{}.min{}",
            &filename[..dir_len],
            &base[..index],
            &base[index..]
        ),
        _ => format!("{}.min", filename),
    }
}

fn basename(filename: &str) -> &str {
    filename
        .rfind(|c: char| c == '/' || c == '\\')
        .map(|index| &filename[index + 1..])
        .unwrap_or(filename)
}
