//! Literal and comment scanning.
//!
//! A [`Lexer`] is one alternation regex over the comment and literal syntax of
//! a language. Matching runs left to right, so whichever construct opens first
//! owns the text: a quote inside a comment never opens a string, and `//`
//! inside a string never opens a comment.
//!
//! Literals, and comments that are kept, are swapped for `\u{E000}N\u{E001}`
//! placeholders; removed comments are swapped for their replacement text. The
//! placeholders contain no whitespace, punctuation or identifier characters,
//! so rewrite rules pass over them untouched.

use crate::utils::{MinifyError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex};

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").unwrap());

/// Group wrapping every comment alternative of a lexer pattern
pub const COMMENT_GROUP: &str = "comment";
/// Prefix of groups that limit protection to part of a literal match
pub const LITERAL_GROUP: &str = "lit";

/// Single-line quoted strings with backslash escapes
pub const QUOTED: &str = r#""(?:[^"\\\n]|\\[\s\S])*"|'(?:[^'\\\n]|\\[\s\S])*'"#;

/// Replacement text for a removed comment, or `None` to keep it verbatim.
/// Receives the comment and its byte offset in the input.
pub type StripComment = fn(&str, usize) -> Option<String>;

pub struct Lexer {
    pattern: Regex,
    literal_groups: Vec<String>,
    strip: StripComment,
}

impl Lexer {
    /// `pattern` puts all comment alternatives in one `comment` group; any other
    /// match is a literal, narrowed to its first participating `lit*` group.
    pub fn new(pattern: &str, strip: StripComment) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("lexer pattern is invalid: {}", e));
        let literal_groups = pattern
            .capture_names()
            .flatten()
            .filter(|name| name.starts_with(LITERAL_GROUP))
            .map(str::to_string)
            .collect();
        Self {
            pattern,
            literal_groups,
            strip,
        }
    }

    fn literal_span<'h>(&self, caps: &Captures<'h>) -> Option<Match<'h>> {
        self.literal_groups.iter().find_map(|name| caps.name(name))
    }
}

impl std::fmt::Debug for Lexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Block comments become a space so `a/**/b` cannot fuse into one token.
/// Line comments matched together with their line break leave the break and
/// the next line's indentation behind.
pub fn strip_comment(comment: &str, _offset: usize) -> Option<String> {
    let body = comment.trim_end_matches([' ', '\t']);
    if body.ends_with('\n') {
        Some(comment[body.len() - 1..].to_string())
    } else {
        Some(" ".to_string())
    }
}

#[derive(Debug)]
pub struct ProtectedText {
    text: String,
    literals: Vec<String>,
}

impl ProtectedText {
    /// Scan `input` once with `lexer`. Comments are removed when `strip_comments`
    /// is set and the lexer agrees, otherwise protected like literals.
    pub fn scan(input: &str, lexer: &Lexer, strip_comments: bool) -> Result<Self> {
        if input.contains(OPEN) || input.contains(CLOSE) {
            return Err(MinifyError::UnsafeInput(
                "input contains private-use sentinel characters".to_string(),
            ));
        }

        let mut literals = Vec::new();
        let text = lexer
            .pattern
            .replace_all(input, |caps: &Captures| {
                if let Some(comment) = caps.name(COMMENT_GROUP) {
                    let removed = strip_comments
                        .then(|| (lexer.strip)(comment.as_str(), comment.start()))
                        .flatten();
                    return match removed {
                        Some(replacement) => replacement,
                        None => placeholder(&mut literals, &caps[0]),
                    };
                }
                stash(caps, lexer.literal_span(caps), &mut literals)
            })
            .into_owned();

        Ok(Self { text, literals })
    }

    /// Protect further matches of `pattern` in the already scanned text.
    /// A `lit` group narrows protection as in [`Lexer`].
    pub fn also_protect(&mut self, pattern: &Regex) {
        let literals = &mut self.literals;
        let text = pattern
            .replace_all(&self.text, |caps: &Captures| {
                stash(caps, caps.name(LITERAL_GROUP), literals)
            })
            .into_owned();
        self.text = text;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn literal_count(&self) -> usize {
        self.literals.len()
    }

    /// Put the literals back into `rewritten`. Placeholders dropped by the rules
    /// simply stay gone.
    pub fn restore(&self, rewritten: &str) -> String {
        let mut current = rewritten.to_string();
        // Later protections may have captured earlier placeholders; unwind until none remain
        for _ in 0..=self.literals.len() {
            if !current.contains(OPEN) {
                break;
            }
            current = PLACEHOLDER
                .replace_all(&current, |caps: &Captures| {
                    caps[1]
                        .parse::<usize>()
                        .ok()
                        .and_then(|index| self.literals.get(index))
                        .cloned()
                        .unwrap_or_default()
                })
                .into_owned();
        }
        current
    }
}

fn stash(caps: &Captures, span: Option<Match>, literals: &mut Vec<String>) -> String {
    let whole = caps.get(0).map(|m| (m.start(), m.as_str())).unwrap_or((0, ""));
    match span {
        Some(lit) => {
            let (start, text) = whole;
            let before = &text[..lit.start() - start];
            let after = &text[lit.end() - start..];
            format!("{}{}{}", before, placeholder(literals, lit.as_str()), after)
        }
        None => placeholder(literals, whole.1),
    }
}

fn placeholder(literals: &mut Vec<String>, literal: &str) -> String {
    literals.push(literal.to_string());
    format!("{}{}{}", OPEN, literals.len() - 1, CLOSE)
}

#[cfg(test)]
mod tests {
    use super::*;

    static C_LIKE: Lazy<Lexer> = Lazy::new(|| {
        Lexer::new(
            &format!(r"(?P<comment>/\*[\s\S]*?\*/|//[^\n]*(?:\n[ \t]*)?)|{}", QUOTED),
            strip_comment,
        )
    });

    #[test]
    fn test_round_trip_restores_strings() {
        let source = r#"a = "x   y"; b = 'it''s'"#;
        let protected = ProtectedText::scan(source, &C_LIKE, true).unwrap();
        assert!(!protected.text().contains("x   y"));
        assert_eq!(protected.restore(protected.text()), source);
    }

    #[test]
    fn test_first_opener_wins() {
        let protected = ProtectedText::scan("/* it's */ x = 'a'; /* end */ y;", &C_LIKE, true).unwrap();
        assert_eq!(protected.literal_count(), 1);
        assert_eq!(protected.restore(protected.text()), "  x = 'a';   y;");

        let protected = ProtectedText::scan("s = \"a // b\"; // it's", &C_LIKE, true).unwrap();
        assert_eq!(protected.restore(protected.text()), "s = \"a // b\";  ");
    }

    #[test]
    fn test_line_comment_leaves_break_and_indent() {
        let protected = ProtectedText::scan("a; // c\n    b;", &C_LIKE, true).unwrap();
        assert_eq!(protected.text(), "a; \n    b;");
    }

    #[test]
    fn test_kept_comments_are_protected() {
        let source = "a; // don't\n  b;";
        let protected = ProtectedText::scan(source, &C_LIKE, false).unwrap();
        assert_eq!(protected.literal_count(), 1);
        assert!(!protected.text().contains('\''));
        assert_eq!(protected.restore(protected.text()), source);
    }

    #[test]
    fn test_group_limits_protection() {
        let lexer = Lexer::new(r"(?s)<pre>(?P<lit_pre>.*?)</pre>", strip_comment);
        let protected = ProtectedText::scan("<pre> a  b </pre>", &lexer, true).unwrap();
        assert!(protected.text().starts_with("<pre>"));
        assert!(protected.text().ends_with("</pre>"));
        assert_eq!(protected.literal_count(), 1);
    }

    #[test]
    fn test_also_protect_nests() {
        let outer = Regex::new(r"\[[^\]]*\]").unwrap();
        let source = r#"[ "a" ] rest"#;
        let mut protected = ProtectedText::scan(source, &C_LIKE, true).unwrap();
        protected.also_protect(&outer);
        assert_eq!(protected.literal_count(), 2);
        assert_eq!(protected.restore(protected.text()), source);
    }

    #[test]
    fn test_sentinel_input_is_rejected() {
        let source = "a \u{E000}0\u{E001} b";
        let err = ProtectedText::scan(source, &C_LIKE, true).unwrap_err();
        assert!(matches!(err, MinifyError::UnsafeInput(_)));
    }

    #[test]
    fn test_dropped_placeholders_stay_dropped() {
        let protected = ProtectedText::scan(r#"x "s" y"#, &C_LIKE, true).unwrap();
        assert_eq!(protected.restore("x y"), "x y");
    }
}
