use super::backend::ensure_enabled;
use crate::core::interfaces::{BackendOutput, MinifyBackend};
use crate::core::models::{MinificationLevel, MinificationOptions};
use crate::utils::{MinifyError, Result};
use minify_html::{minify, Cfg};

const NAME: &str = "minify-html";

/// HTML minification with minify-html, including inline CSS and JS above the light level
pub struct MinifyHtmlBackend;

impl MinifyHtmlBackend {
    fn cfg(options: &MinificationOptions) -> Cfg {
        let inline_assets = options.level > MinificationLevel::Light;
        let keep_optional_tags = options.level < MinificationLevel::Aggressive;
        Cfg {
            minify_css: inline_assets,
            minify_js: inline_assets,
            keep_comments: !options.remove_comments,
            keep_closing_tags: keep_optional_tags,
            keep_html_and_head_opening_tags: keep_optional_tags,
            // Preserve template syntax for compatibility
            preserve_brace_template_syntax: true,
            ..Cfg::default()
        }
    }
}

impl MinifyBackend for MinifyHtmlBackend {
    fn name() -> &'static str {
        NAME
    }

    fn load() -> Result<Self> {
        ensure_enabled(NAME)?;
        let backend = MinifyHtmlBackend;
        backend
            .minify("<p> sample </p>", &MinificationOptions::default())
            .map_err(|e| MinifyError::backend_load(NAME, e.to_string()))?;
        Ok(backend)
    }

    fn minify(&self, content: &str, options: &MinificationOptions) -> Result<BackendOutput> {
        let bytes = minify(content.as_bytes(), &Self::cfg(options));
        let code = String::from_utf8(bytes)
            .map_err(|e| MinifyError::backend_processing(NAME, e.to_string()))?;

        let mut output = BackendOutput::new(code);
        if !options.remove_whitespace {
            output
                .warnings
                .push(format!("{} always collapses whitespace", NAME));
        }
        Ok(output)
    }
}
