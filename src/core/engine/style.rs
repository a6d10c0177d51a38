use super::literals::{strip_comment, Lexer, ProtectedText, QUOTED};
use super::rules::{rewrite_rule, Pipeline, RewriteRule, EMPTY_LINES, TRIM};
use super::rules::{COLLAPSE_HORIZONTAL, COLLAPSE_WHITESPACE, TRIM_LINES};
use super::{guarded, Transformed};
use crate::core::models::{MinificationLevel, MinificationOptions, MinificationResult};
use once_cell::sync::Lazy;

// Unquoted url() bodies may hold characters the punctuation rule would touch
static STYLE_LEXER: Lazy<Lexer> = Lazy::new(|| {
    Lexer::new(
        &format!(r#"(?P<comment>/\*[\s\S]*?\*/)|{}|(?i:url)\((?P<lit_url>[^)"']*)\)"#, QUOTED),
        strip_comment,
    )
});

rewrite_rule!(pub CSS_PUNCTUATION = "css-punctuation", r"\s*([{};:,>])\s*", "$1");
rewrite_rule!(pub CSS_PUNCTUATION_INLINE = "css-punctuation-inline", r"[ \t]*([{};:,>])[ \t]*", "$1");
rewrite_rule!(pub CSS_SEMICOLON_BRACE = "css-semicolon-brace", r";+(\s*)\}", "$1}");
rewrite_rule!(pub CSS_LEADING_ZERO = "css-leading-zero", r"(^|[^\w.\-])(-?)0+\.(\d)", "$1$2.$3");

// `0%` before `{` is a keyframe selector and keeps its unit
pub static CSS_ZERO_UNITS: Lazy<RewriteRule> = Lazy::new(|| {
    RewriteRule::new(
        "css-zero-units",
        r"([\s:,(])0(?:\.0+)?(?:px|em|rem|ex|ch|vw|vh|vmin|vmax|cm|mm|in|pt|pc|%)([\s;,)}!]|$)",
        "${1}0$2",
    )
    .until_stable()
});

pub static CSS_FONT_WEIGHT: Lazy<RewriteRule> = Lazy::new(|| {
    RewriteRule::with_fn(
        "css-font-weight",
        r"(?i)(font-weight\s*:\s*)(normal|bold)\b",
        |caps| {
            let weight = if caps[2].eq_ignore_ascii_case("bold") { "700" } else { "400" };
            format!("{}{}", &caps[1], weight)
        },
    )
});

pub fn style_pipeline(options: &MinificationOptions) -> Pipeline {
    let mut pipeline = Pipeline::new();
    let tighten = options.level >= MinificationLevel::Moderate;
    if options.remove_whitespace {
        if options.preserve_line_breaks {
            pipeline
                .push(&COLLAPSE_HORIZONTAL)
                .push(&TRIM_LINES)
                .push_if(tighten, &CSS_PUNCTUATION_INLINE);
        } else {
            pipeline
                .push(&COLLAPSE_WHITESPACE)
                .push_if(tighten, &CSS_PUNCTUATION);
        }
    }
    pipeline.push_if(options.remove_empty_lines, &EMPTY_LINES);

    if options.is_aggressive() {
        pipeline
            .push(&CSS_SEMICOLON_BRACE)
            .push(&CSS_ZERO_UNITS)
            .push(&CSS_LEADING_ZERO)
            .push(&CSS_FONT_WEIGHT);
    }
    pipeline.push(&TRIM);
    pipeline
}

/// Minify a stylesheet
pub fn minify_css(content: &str, options: &MinificationOptions) -> MinificationResult {
    guarded("CSS", content, options, |content, options| {
        let protected = ProtectedText::scan(content, &STYLE_LEXER, options.remove_comments)?;
        let rewritten = style_pipeline(options).run(protected.text());
        Ok(Transformed::new(protected.restore(&rewritten)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggressive() -> MinificationOptions {
        MinificationOptions::default().with_level(MinificationLevel::Aggressive)
    }

    #[test]
    fn test_moderate_tightens_punctuation() {
        let source = "/* theme */\n.a {\n  color : red ;\n  margin: 0px;\n}\n";
        let result = minify_css(source, &MinificationOptions::default());
        assert_eq!(result.minified, ".a{color:red;margin:0px;}");
    }

    #[test]
    fn test_light_only_collapses() {
        let options = MinificationOptions::default().with_level(MinificationLevel::Light);
        let result = minify_css(".a {\n  color: red;\n}", &options);
        assert_eq!(result.minified, ".a { color: red; }");
    }

    #[test]
    fn test_aggressive_numeric_rules() {
        let source = "a { margin: 0px 0.50em; font-weight: bold; opacity: 0.5; }";
        let result = minify_css(source, &aggressive());
        assert_eq!(result.minified, "a{margin:0 .50em;font-weight:700;opacity:.5}");
    }

    #[test]
    fn test_zero_units_in_sequence() {
        let result = minify_css("p { padding: 0px 0em 0% 0rem; }", &aggressive());
        assert_eq!(result.minified, "p{padding:0 0 0 0}");
    }

    #[test]
    fn test_keyframe_percentages_survive() {
        let result = minify_css("@keyframes f { 0% { top: 0px; } 100% { top: 10px; } }", &aggressive());
        assert!(result.minified.contains("0%{top:0}"));
        assert!(result.minified.contains("100%{"));
    }

    #[test]
    fn test_font_weight_normal() {
        let result = minify_css("b { font-weight: normal }", &aggressive());
        assert_eq!(result.minified, "b{font-weight:400}");
    }

    #[test]
    fn test_strings_and_urls_are_protected() {
        let source = "a::before { content: \"  x ; y  \"; background: url(a b.png); }";
        let result = minify_css(source, &MinificationOptions::default());
        assert!(result.minified.contains("\"  x ; y  \""));
        assert!(result.minified.contains("url(a b.png)"));
    }

    #[test]
    fn test_comments_can_be_kept() {
        let options = MinificationOptions {
            remove_comments: false,
            ..Default::default()
        };
        let result = minify_css("/* keep */ a { b: c }", &options);
        assert!(result.minified.starts_with("/* keep */"));
    }

    #[test]
    fn test_quotes_inside_comments() {
        let source = "/* don't */ a { content: 'x'; } /* it's */ b { c: d }";
        let result = minify_css(source, &MinificationOptions::default());
        assert_eq!(result.minified, "a{content:'x';}b{c:d}");
    }
}
