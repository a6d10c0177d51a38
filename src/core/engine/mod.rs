//! Basic minification engine.
//!
//! Always available, rule-based, and total: every public function returns a
//! [`MinificationResult`]. Failures (including panics inside a rule) are
//! recorded in `errors` and the original text is handed back unchanged.

pub mod literals;
pub mod rules;

mod data;
mod generic;
mod markup;
mod script;
mod style;

pub use data::minify_json;
pub use generic::minify_generic;
pub use markup::{minify_html, minify_xml};
pub use script::{mangle_identifiers, minify_js, MangleReport};
pub use style::minify_css;

use crate::core::models::{MinificationOptions, MinificationResult, SupportedLanguage};
use crate::utils::Result;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Text produced by a language transform before it is wrapped in a result
#[derive(Debug, Default)]
pub struct Transformed {
    pub code: String,
    pub warnings: Vec<String>,
}

impl Transformed {
    pub fn new(code: String) -> Self {
        Self {
            code,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Route `content` to the basic minifier for `language`
pub fn minify(content: &str, language: SupportedLanguage, options: &MinificationOptions) -> MinificationResult {
    match language {
        SupportedLanguage::Html => minify_html(content, options),
        SupportedLanguage::Css => minify_css(content, options),
        SupportedLanguage::Javascript | SupportedLanguage::Typescript => minify_js(content, options),
        SupportedLanguage::Json => minify_json(content, options),
        SupportedLanguage::Xml => minify_xml(content, options),
        other => minify_generic(content, other, options),
    }
}

/// Run `transform` behind the engine's failure boundary
pub(crate) fn guarded<F>(
    label: &str,
    content: &str,
    options: &MinificationOptions,
    transform: F,
) -> MinificationResult
where
    F: FnOnce(&str, &MinificationOptions) -> Result<Transformed>,
{
    if content.is_empty() {
        return MinificationResult::unchanged(content);
    }

    match panic::catch_unwind(AssertUnwindSafe(|| transform(content, options))) {
        Ok(Ok(transformed)) => MinificationResult::new(content, transformed.code, transformed.warnings),
        Ok(Err(err)) => {
            tracing::debug!("{} minification failed: {}", label, err);
            MinificationResult::failed(content, format!("{} minification failed: {}", label, err))
        }
        Err(payload) => MinificationResult::failed(
            content,
            format!("{} minification failed: {}", label, panic_message(payload.as_ref())),
        ),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected internal error".to_string()
    }
}
