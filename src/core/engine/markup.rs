use super::literals::{Lexer, ProtectedText};
use super::rules::{rewrite_rule, Pipeline, RewriteRule, COLLAPSE_HORIZONTAL, COLLAPSE_WHITESPACE};
use super::rules::{EMPTY_LINES, TRIM, TRIM_LINES};
use super::{guarded, Transformed};
use crate::core::models::{MinificationLevel, MinificationOptions, MinificationResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const MARKUP_COMMENT: &str = r"(?P<comment><!--[\s\S]*?-->)";
const ATTRIBUTE_VALUE: &str = r#"=\s*(?P<lit_attr>"[^"]*"|'[^']*')"#;

fn verbatim_body(tag: &str) -> String {
    format!(r"(?is:<{tag}\b[^>]*>(?P<lit_{tag}>.*?)</{tag}\s*>)")
}

static HTML_LEXER: Lazy<Lexer> = Lazy::new(|| {
    let bodies: Vec<String> = ["pre", "textarea", "script", "style"]
        .iter()
        .map(|tag| verbatim_body(tag))
        .collect();
    Lexer::new(
        &format!("{}|{}|{}", MARKUP_COMMENT, bodies.join("|"), ATTRIBUTE_VALUE),
        strip_html_comment,
    )
});

static XML_LEXER: Lazy<Lexer> = Lazy::new(|| {
    Lexer::new(
        &format!(r"{}|<!\[CDATA\[[\s\S]*?\]\]>|{}", MARKUP_COMMENT, ATTRIBUTE_VALUE),
        |_, _| Some(String::new()),
    )
});

// Attribute values inside the opening tag of a verbatim element
static TAG_ATTRIBUTE_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"=\s*(?P<lit>"[^"]*"|'[^']*')"#).unwrap());
static OPENING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[A-Za-z][\w:-]*\s[^<>]*>").unwrap());

static REDUNDANT_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+type\s*=\s*(?:"text/(?:javascript|css)"|'text/(?:javascript|css)')"#).unwrap()
});
static BOOLEAN_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(checked|disabled|selected|readonly|multiple|hidden|required|autofocus|async|defer)\s*=\s*(?:""|''|"(?:checked|disabled|selected|readonly|multiple|hidden|required|autofocus|async|defer)"|'(?:checked|disabled|selected|readonly|multiple|hidden|required|autofocus|async|defer)')"#,
    )
    .unwrap()
});

// Conditional comments carry behaviour for old IE and are kept
fn strip_html_comment(comment: &str, _offset: usize) -> Option<String> {
    (!comment.starts_with("<!--[if")).then(String::new)
}

rewrite_rule!(pub INTER_TAG = "inter-tag", r">\s+<", "><");
rewrite_rule!(pub INTER_TAG_INLINE = "inter-tag-inline", r">[ \t]+<", "><");
rewrite_rule!(pub TAG_CLOSE_SPACE = "tag-close-space", r"[ \t\n]+(/?>)", "$1");

/// Drop attributes whose presence or value is implied, e.g. `type="text/css"` or `checked="checked"`
pub static REDUNDANT_ATTRIBUTES: Lazy<RewriteRule> = Lazy::new(|| {
    RewriteRule::with_fn("redundant-attributes", r"<[A-Za-z][\w:-]*\s[^<>]*>", |caps: &Captures| {
        let tag = REDUNDANT_TYPE.replace_all(&caps[0], "");
        BOOLEAN_ATTRIBUTE.replace_all(&tag, "$1").into_owned()
    })
});

/// Apply [`REDUNDANT_ATTRIBUTES`] to the opening tags left in scanned text.
/// Verbatim bodies are still placeholders, so tags quoted inside them stay as written.
fn drop_redundant_attributes(text: &str, protected: &ProtectedText) -> String {
    OPENING_TAG
        .replace_all(text, |caps: &Captures| REDUNDANT_ATTRIBUTES.apply(&protected.restore(&caps[0])))
        .into_owned()
}

fn markup_pipeline(options: &MinificationOptions) -> Pipeline {
    let mut pipeline = Pipeline::new();
    let tighten = options.level >= MinificationLevel::Moderate;
    if options.remove_whitespace {
        if options.preserve_line_breaks {
            pipeline
                .push_if(tighten, &INTER_TAG_INLINE)
                .push(&COLLAPSE_HORIZONTAL)
                .push(&TRIM_LINES);
        } else {
            pipeline
                .push_if(tighten, &INTER_TAG)
                .push(&COLLAPSE_WHITESPACE)
                .push_if(tighten, &TAG_CLOSE_SPACE);
        }
    }
    pipeline
        .push_if(options.remove_empty_lines, &EMPTY_LINES)
        .push(&TRIM);
    pipeline
}

/// Minify an HTML document or fragment.
///
/// Attribute values and the bodies of `pre`, `textarea`, `script` and `style`
/// pass through untouched.
pub fn minify_html(content: &str, options: &MinificationOptions) -> MinificationResult {
    guarded("HTML", content, options, |content, options| {
        let mut protected = ProtectedText::scan(content, &HTML_LEXER, options.remove_comments)?;
        protected.also_protect(&TAG_ATTRIBUTE_VALUE);
        let mut rewritten = markup_pipeline(options).run(protected.text());
        if options.is_aggressive() {
            rewritten = drop_redundant_attributes(&rewritten, &protected);
        }
        Ok(Transformed::new(protected.restore(&rewritten)))
    })
}

/// Minify an XML document. CDATA sections and attribute values are kept verbatim.
pub fn minify_xml(content: &str, options: &MinificationOptions) -> MinificationResult {
    guarded("XML", content, options, |content, options| {
        let protected = ProtectedText::scan(content, &XML_LEXER, options.remove_comments)?;
        let rewritten = markup_pipeline(options).run(protected.text());
        Ok(Transformed::new(protected.restore(&rewritten)))
    })
}
