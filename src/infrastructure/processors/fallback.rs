use super::backend::BackendHandle;
use super::css_processor::LightningCssBackend;
use super::html_processor::MinifyHtmlBackend;
use super::js_processor::OxcBackend;
use crate::core::engine::{self, panic_message};
use crate::core::interfaces::MinifyBackend;
use crate::core::models::{MinificationOptions, MinificationResult, SupportedLanguage};
use crate::utils::Logger;
use std::panic::{self, AssertUnwindSafe};

/// Basic engine function used when a backend cannot deliver
pub type BasicMinifier = fn(&str, &MinificationOptions) -> MinificationResult;

/// Try the backend behind `handle`, falling back to `basic` on any failure.
///
/// Load errors, processing errors and panics all end up as the first warning
/// of the basic engine's result. Backend warnings are forwarded on success.
pub fn minify_with_fallback<B: MinifyBackend>(
    handle: &BackendHandle<B>,
    content: &str,
    options: &MinificationOptions,
    basic: BasicMinifier,
) -> MinificationResult {
    if content.is_empty() {
        return MinificationResult::unchanged(content);
    }

    let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
        handle
            .ensure_loaded()
            .and_then(|backend| backend.minify(content, options))
    }));

    let failure = match attempt {
        Ok(Ok(output)) => return MinificationResult::new(content, output.code, output.warnings),
        Ok(Err(err)) => err.to_string(),
        Err(payload) => format!("{} backend panicked: {}", B::name(), panic_message(payload.as_ref())),
    };

    Logger::fallback(B::name(), &failure);
    let mut result = basic(content, options);
    result
        .warnings
        .insert(0, format!("{}; used the basic minifier instead", failure));
    result
}

/// Backend-first minification for HTML, CSS and JavaScript.
///
/// Each backend is loaded on first use and cached for the lifetime of the
/// minifier; every other language goes straight to the basic engine.
pub struct AdvancedMinifier {
    html: BackendHandle<MinifyHtmlBackend>,
    css: BackendHandle<LightningCssBackend>,
    js: BackendHandle<OxcBackend>,
}

static GLOBAL: AdvancedMinifier = AdvancedMinifier::new();

impl AdvancedMinifier {
    pub const fn new() -> Self {
        Self {
            html: BackendHandle::new(),
            css: BackendHandle::new(),
            js: BackendHandle::new(),
        }
    }

    /// Process-wide instance
    pub fn global() -> &'static AdvancedMinifier {
        &GLOBAL
    }

    pub fn minify_html(&self, content: &str, options: &MinificationOptions) -> MinificationResult {
        minify_with_fallback(&self.html, content, options, engine::minify_html)
    }

    pub fn minify_css(&self, content: &str, options: &MinificationOptions) -> MinificationResult {
        minify_with_fallback(&self.css, content, options, engine::minify_css)
    }

    pub fn minify_js(&self, content: &str, options: &MinificationOptions) -> MinificationResult {
        minify_with_fallback(&self.js, content, options, engine::minify_js)
    }

    pub fn minify(
        &self,
        content: &str,
        language: SupportedLanguage,
        options: &MinificationOptions,
    ) -> MinificationResult {
        match language {
            SupportedLanguage::Html => self.minify_html(content, options),
            SupportedLanguage::Css => self.minify_css(content, options),
            SupportedLanguage::Javascript => self.minify_js(content, options),
            other => engine::minify(content, other, options),
        }
    }

    /// Backend names with their load state, for diagnostics
    pub fn backend_status(&self) -> [(&'static str, bool); 3] {
        [
            (MinifyHtmlBackend::name(), self.html.is_loaded()),
            (LightningCssBackend::name(), self.css.is_loaded()),
            (OxcBackend::name(), self.js.is_loaded()),
        ]
    }
}

impl Default for AdvancedMinifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interfaces::BackendOutput;
    use crate::utils::{MinifyError, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    static FAILED_LOADS: AtomicUsize = AtomicUsize::new(0);

    struct MissingBackend;

    impl MinifyBackend for MissingBackend {
        fn name() -> &'static str {
            "missing"
        }

        fn load() -> Result<Self> {
            FAILED_LOADS.fetch_add(1, Ordering::SeqCst);
            Err(MinifyError::backend_load("missing", "not installed"))
        }

        fn minify(&self, _: &str, _: &MinificationOptions) -> Result<BackendOutput> {
            unreachable!("never loads")
        }
    }

    struct ExplodingBackend;

    impl MinifyBackend for ExplodingBackend {
        fn name() -> &'static str {
            "exploding"
        }

        fn load() -> Result<Self> {
            Ok(ExplodingBackend)
        }

        fn minify(&self, _: &str, _: &MinificationOptions) -> Result<BackendOutput> {
            panic!("backend bug")
        }
    }

    struct ChattyBackend;

    impl MinifyBackend for ChattyBackend {
        fn name() -> &'static str {
            "chatty"
        }

        fn load() -> Result<Self> {
            Ok(ChattyBackend)
        }

        fn minify(&self, content: &str, _: &MinificationOptions) -> Result<BackendOutput> {
            Ok(BackendOutput {
                code: content.trim().to_string(),
                warnings: vec!["unknown property".to_string()],
            })
        }
    }

    const CSS: &str = "a {  color : red ; }";

    #[test]
    fn test_load_failure_falls_back() {
        let handle = BackendHandle::<MissingBackend>::new();
        let options = MinificationOptions::default();

        let result = minify_with_fallback(&handle, CSS, &options, engine::minify_css);
        assert_eq!(result.minified, engine::minify_css(CSS, &options).minified);
        assert!(result.errors.is_empty());
        assert!(result.warnings[0].contains("not installed"));

        // Not cached as loaded, so the next call tries again
        minify_with_fallback(&handle, CSS, &options, engine::minify_css);
        assert_eq!(FAILED_LOADS.load(Ordering::SeqCst), 2);
        assert!(!handle.is_loaded());
    }

    #[test]
    fn test_backend_panic_is_contained() {
        let handle = BackendHandle::<ExplodingBackend>::new();
        let result = minify_with_fallback(&handle, CSS, &MinificationOptions::default(), engine::minify_css);
        assert_eq!(result.minified, "a{color:red;}");
        assert!(result.warnings[0].contains("backend bug"));
    }

    #[test]
    fn test_backend_warnings_are_forwarded() {
        let handle = BackendHandle::<ChattyBackend>::new();
        let result = minify_with_fallback(&handle, "  x  ", &MinificationOptions::default(), engine::minify_css);
        assert_eq!(result.minified, "x");
        assert_eq!(result.warnings, vec!["unknown property".to_string()]);
        assert!(handle.is_loaded());
    }

    #[test]
    fn test_other_languages_use_basic_engine() {
        let minifier = AdvancedMinifier::new();
        let options = MinificationOptions::default();
        let result = minifier.minify("{ \"a\" : 1 }", SupportedLanguage::Json, &options);
        assert_eq!(result.minified, r#"{"a":1}"#);
        assert!(minifier.backend_status().iter().all(|(_, loaded)| !loaded));
    }

    #[test]
    fn test_invalid_json_keeps_error_contract() {
        let minifier = AdvancedMinifier::new();
        let result = minifier.minify("{ nope", SupportedLanguage::Json, &MinificationOptions::default());
        assert_eq!(result.minified, "{ nope");
        assert_eq!(result.errors.len(), 1);
    }
}
