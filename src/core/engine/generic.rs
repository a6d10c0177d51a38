use super::literals::{strip_comment, Lexer, ProtectedText, QUOTED};
use super::rules::{rewrite_rule, Pipeline, COLLAPSE_HORIZONTAL, COLLAPSE_WHITESPACE};
use super::rules::{EMPTY_LINES, INNER_SPACES, TRAILING_SPACE, TRIM, TRIM_LINES};
use super::{guarded, Transformed};
use crate::core::models::{
    CommentStyle, LineSensitivity, MinificationLevel, MinificationOptions, MinificationResult,
    SupportedLanguage,
};
use once_cell::sync::Lazy;

const TRIPLE_QUOTED: &str = r#""""[\s\S]*?"""|'''[\s\S]*?'''"#;
const BACKTICK_QUOTED: &str = r"`[^`]*`";

// Line comments take their line break and the next line's indentation along,
// so a removed comment leaves the line structure intact
const BLOCK: &str = r"/\*[\s\S]*?\*/";
const SLASH: &str = r"//[^\n]*(?:\n[ \t]*)?";
const DASH: &str = r"--[^\n]*(?:\n[ \t]*)?";
const HASH: &str = r"(?:(?m:^)|[ \t])#[^\n]*(?:\n[ \t]*)?";
// `#[` opens a PHP attribute, not a comment
const PHP_HASH: &str = r"(?:(?m:^)|[ \t])#(?:[^\[\n][^\n]*)?(?:\n[ \t]*|\z)";
const POWERSHELL_BLOCK: &str = r"<#[\s\S]*?#>";
const MATLAB_BLOCK: &str = r"(?m:^)[ \t]*%\{[\s\S]*?(?m:^)[ \t]*%\}";
const PERCENT: &str = r"%[^\n]*(?:\n[ \t]*)?";
const MARKUP: &str = r"<!--[\s\S]*?-->";

fn lexer(comments: &[&str]) -> Lexer {
    let literals = format!("{}|{}|{}", TRIPLE_QUOTED, QUOTED, BACKTICK_QUOTED);
    if comments.is_empty() {
        return Lexer::new(&literals, strip_comment);
    }
    Lexer::new(
        &format!("(?P<comment>{})|{}", comments.join("|"), literals),
        strip_hash_comment,
    )
}

/// A shebang on the first line goes back into the text as is
fn strip_hash_comment(comment: &str, offset: usize) -> Option<String> {
    if offset == 0 && comment.starts_with("#!") {
        return Some(comment.to_string());
    }
    strip_comment(comment, offset)
}

static C_FAMILY: Lazy<Lexer> = Lazy::new(|| lexer(&[BLOCK, SLASH]));
static PHP: Lazy<Lexer> = Lazy::new(|| lexer(&[BLOCK, SLASH, PHP_HASH]));
static HASH_ONLY: Lazy<Lexer> = Lazy::new(|| lexer(&[HASH]));
static POWERSHELL: Lazy<Lexer> = Lazy::new(|| lexer(&[POWERSHELL_BLOCK, HASH]));
static SQL: Lazy<Lexer> = Lazy::new(|| lexer(&[BLOCK, DASH]));
static MATLAB: Lazy<Lexer> = Lazy::new(|| lexer(&[MATLAB_BLOCK, PERCENT]));
static MARKUP_ONLY: Lazy<Lexer> = Lazy::new(|| lexer(&[MARKUP]));
static LITERALS_ONLY: Lazy<Lexer> = Lazy::new(|| lexer(&[]));

rewrite_rule!(pub LOOSE_PUNCTUATION = "loose-punctuation", r"[ \t]*([{};,=])[ \t]*", "$1");
rewrite_rule!(pub FREE_PUNCTUATION = "free-punctuation", r"\s*([{};,=])\s*", "$1");

fn comment_lexer(style: CommentStyle) -> &'static Lexer {
    match style {
        CommentStyle::CFamily => &C_FAMILY,
        CommentStyle::Php => &PHP,
        CommentStyle::Hash => &HASH_ONLY,
        CommentStyle::PowerShell => &POWERSHELL,
        CommentStyle::Sql => &SQL,
        CommentStyle::Matlab => &MATLAB,
        CommentStyle::Markup => &MARKUP_ONLY,
        CommentStyle::None => &LITERALS_ONLY,
    }
}

/// Punctuation tightening is only safe where braces and semicolons are plain delimiters
fn tightens_punctuation(style: CommentStyle) -> bool {
    matches!(style, CommentStyle::CFamily | CommentStyle::Php | CommentStyle::Sql)
}

pub fn generic_pipeline(language: SupportedLanguage, options: &MinificationOptions) -> Pipeline {
    let style = language.comment_style();
    let mut pipeline = Pipeline::new();
    let tighten = options.level >= MinificationLevel::Moderate && tightens_punctuation(style);
    if options.remove_whitespace {
        match language.line_sensitivity() {
            LineSensitivity::Indentation => {
                pipeline.push(&TRAILING_SPACE).push(&INNER_SPACES);
            }
            LineSensitivity::Lines => {
                pipeline
                    .push(&COLLAPSE_HORIZONTAL)
                    .push(&TRIM_LINES)
                    .push_if(tighten, &LOOSE_PUNCTUATION);
            }
            LineSensitivity::FreeForm if options.preserve_line_breaks => {
                pipeline
                    .push(&COLLAPSE_HORIZONTAL)
                    .push(&TRIM_LINES)
                    .push_if(tighten, &LOOSE_PUNCTUATION);
            }
            LineSensitivity::FreeForm => {
                pipeline
                    .push(&COLLAPSE_WHITESPACE)
                    .push_if(tighten, &FREE_PUNCTUATION);
            }
        }
    }
    pipeline
        .push_if(options.remove_empty_lines, &EMPTY_LINES)
        .push(&TRIM);
    pipeline
}

/// Comment stripping and whitespace collapse for languages without a dedicated minifier.
///
/// Line breaks survive for languages where they end statements, and Python
/// keeps its indentation.
pub fn minify_generic(
    content: &str,
    language: SupportedLanguage,
    options: &MinificationOptions,
) -> MinificationResult {
    guarded(language.as_str(), content, options, |content, options| {
        let lexer = comment_lexer(language.comment_style());
        let protected = ProtectedText::scan(content, lexer, options.remove_comments)?;
        let rewritten = generic_pipeline(language, options).run(protected.text());
        Ok(Transformed::new(protected.restore(&rewritten)))
    })
}
