use super::backend::ensure_enabled;
use crate::core::interfaces::{BackendOutput, MinifyBackend};
use crate::core::models::{MinificationLevel, MinificationOptions};
use crate::utils::{MinifyError, Result};
use lightningcss::{
    printer::PrinterOptions,
    stylesheet::{MinifyOptions, ParserOptions as CssParserOptions, StyleSheet},
};
use std::sync::{Arc, RwLock};

const NAME: &str = "lightningcss";

/// CSS minification with lightningcss. Recoverable parse problems come back as warnings.
pub struct LightningCssBackend;

impl MinifyBackend for LightningCssBackend {
    fn name() -> &'static str {
        NAME
    }

    fn load() -> Result<Self> {
        ensure_enabled(NAME)?;
        let backend = LightningCssBackend;
        backend
            .minify(".sample { color: red }", &MinificationOptions::default())
            .map_err(|e| MinifyError::backend_load(NAME, e.to_string()))?;
        Ok(backend)
    }

    fn minify(&self, content: &str, options: &MinificationOptions) -> Result<BackendOutput> {
        let warnings = Arc::new(RwLock::new(Vec::new()));
        let parser_options = CssParserOptions {
            error_recovery: true,
            warnings: Some(warnings.clone()),
            ..CssParserOptions::default()
        };

        let mut stylesheet = StyleSheet::parse(content, parser_options)
            .map_err(|e| MinifyError::backend_processing(NAME, e.to_string()))?;

        if options.level > MinificationLevel::Light {
            stylesheet
                .minify(MinifyOptions::default())
                .map_err(|e| MinifyError::backend_processing(NAME, e.to_string()))?;
        }

        let printed = stylesheet
            .to_css(PrinterOptions {
                minify: options.remove_whitespace,
                ..PrinterOptions::default()
            })
            .map_err(|e| MinifyError::backend_processing(NAME, e.to_string()))?;

        let mut output = BackendOutput::new(printed.code);
        if let Ok(collected) = warnings.read() {
            output
                .warnings
                .extend(collected.iter().map(|w| format!("{}: {}", NAME, w)));
        }
        if !options.remove_comments {
            output
                .warnings
                .push(format!("{} does not preserve comments", NAME));
        }
        Ok(output)
    }
}
