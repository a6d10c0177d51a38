//! Ordered rewrite rules.
//!
//! Each language builds a [`Pipeline`] out of named, individually testable
//! [`RewriteRule`]s picked according to the options. Rules are plain regex
//! substitutions; nothing here parses the language.

use regex::{Captures, Regex};

/// Upper bound for rules that re-run until the text stops changing
const MAX_PASSES: usize = 8;

pub enum Replacement {
    /// `regex` replacement template (`$1`, `${name}`)
    Template(&'static str),
    /// Computed replacement
    With(fn(&Captures) -> String),
}

pub struct RewriteRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: Replacement,
    until_stable: bool,
}

impl RewriteRule {
    /// Rules are built from literal patterns, so a bad pattern is a programming error
    pub fn new(name: &'static str, pattern: &str, template: &'static str) -> Self {
        Self::build(name, pattern, Replacement::Template(template))
    }

    pub fn with_fn(name: &'static str, pattern: &str, replace: fn(&Captures) -> String) -> Self {
        Self::build(name, pattern, Replacement::With(replace))
    }

    fn build(name: &'static str, pattern: &str, replacement: Replacement) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("rewrite rule `{}` has an invalid pattern: {}", name, e));
        Self {
            name,
            pattern,
            replacement,
            until_stable: false,
        }
    }

    /// Re-apply until a fixed point, for patterns whose matches overlap
    pub fn until_stable(mut self) -> Self {
        self.until_stable = true;
        self
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.pattern.is_match(input)
    }

    pub fn apply(&self, input: &str) -> String {
        let mut current = self.apply_once(input);
        if self.until_stable {
            for _ in 1..MAX_PASSES {
                let next = self.apply_once(&current);
                if next == current {
                    break;
                }
                current = next;
            }
        }
        current
    }

    fn apply_once(&self, input: &str) -> String {
        match &self.replacement {
            Replacement::Template(template) => self.pattern.replace_all(input, *template).into_owned(),
            Replacement::With(replace) => self
                .pattern
                .replace_all(input, |caps: &Captures| replace(caps))
                .into_owned(),
        }
    }
}

impl std::fmt::Debug for RewriteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewriteRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Declares a lazily compiled rule
macro_rules! rewrite_rule {
    ($(#[$meta:meta])* $vis:vis $ident:ident = $name:literal, $pattern:expr, $template:expr) => {
        $(#[$meta])*
        $vis static $ident: once_cell::sync::Lazy<$crate::core::engine::rules::RewriteRule> =
            once_cell::sync::Lazy::new(|| {
                $crate::core::engine::rules::RewriteRule::new($name, $pattern, $template)
            });
    };
}
pub(crate) use rewrite_rule;

/// An ordered list of rules applied front to back
#[derive(Debug, Default)]
pub struct Pipeline {
    rules: Vec<&'static RewriteRule>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: &'static RewriteRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn push_if(&mut self, condition: bool, rule: &'static RewriteRule) -> &mut Self {
        if condition {
            self.rules.push(rule);
        }
        self
    }

    pub fn extend(&mut self, other: Pipeline) -> &mut Self {
        self.rules.extend(other.rules);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    pub fn run(&self, input: &str) -> String {
        self.rules
            .iter()
            .fold(input.to_string(), |text, rule| rule.apply(&text))
    }
}

rewrite_rule!(pub COLLAPSE_WHITESPACE = "collapse-whitespace", r"\s+", " ");
rewrite_rule!(pub COLLAPSE_HORIZONTAL = "collapse-horizontal", r"[ \t\f]+", " ");
rewrite_rule!(pub TRIM_LINES = "trim-lines", r"(?m)^[ \t]+|[ \t\r]+$", "");
rewrite_rule!(pub TRAILING_SPACE = "trailing-space", r"(?m)[ \t\r]+$", "");
rewrite_rule!(pub INNER_SPACES = "inner-spaces", r"([^ \t\n])[ \t]{2,}", "$1 ");
rewrite_rule!(pub EMPTY_LINES = "empty-lines", r"(?m)^[ \t]*\r?\n", "");
rewrite_rule!(pub TRIM = "trim", r"\A\s+|\s+\z", "");

/// Whitespace steps shared by the engines: collapse, optionally keeping line breaks
pub fn whitespace_pipeline(remove_whitespace: bool, preserve_line_breaks: bool, remove_empty_lines: bool) -> Pipeline {
    let mut pipeline = Pipeline::new();
    if remove_whitespace {
        if preserve_line_breaks {
            pipeline.push(&COLLAPSE_HORIZONTAL).push(&TRIM_LINES);
        } else {
            pipeline.push(&COLLAPSE_WHITESPACE);
        }
    }
    pipeline.push_if(remove_empty_lines, &EMPTY_LINES);
    pipeline
}

/// True when `c` can continue an identifier
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
