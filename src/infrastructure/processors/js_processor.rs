use super::backend::ensure_enabled;
use crate::core::interfaces::{BackendOutput, MinifyBackend};
use crate::core::models::{MinificationLevel, MinificationOptions};
use crate::utils::{MinifyError, Result};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

const NAME: &str = "oxc";

/// JavaScript minification with the oxc parser, compressor, mangler and codegen
pub struct OxcBackend;

impl OxcBackend {
    fn compress_options(options: &MinificationOptions) -> CompressOptions {
        let preset = match options.level {
            MinificationLevel::Light => CompressOptions::safest(),
            MinificationLevel::Moderate => CompressOptions::default(),
            MinificationLevel::Aggressive => CompressOptions::smallest(),
        };
        CompressOptions {
            drop_console: options.remove_console_log,
            drop_debugger: options.remove_debugger,
            ..preset
        }
    }

    fn codegen_options(options: &MinificationOptions) -> CodegenOptions {
        let base = if options.remove_comments {
            CodegenOptions::minify()
        } else {
            CodegenOptions::default()
        };
        CodegenOptions {
            minify: options.remove_whitespace,
            ..base
        }
    }
}

impl MinifyBackend for OxcBackend {
    fn name() -> &'static str {
        NAME
    }

    fn load() -> Result<Self> {
        ensure_enabled(NAME)?;
        let backend = OxcBackend;
        backend
            .minify("export const sample = 1;", &MinificationOptions::default())
            .map_err(|e| MinifyError::backend_load(NAME, e.to_string()))?;
        Ok(backend)
    }

    fn minify(&self, content: &str, options: &MinificationOptions) -> Result<BackendOutput> {
        let allocator = Allocator::default();
        let parse_result = Parser::new(&allocator, content, SourceType::mjs()).parse();

        if parse_result.panicked || !parse_result.errors.is_empty() {
            let errors: Vec<String> = parse_result
                .errors
                .iter()
                .map(|e| format!("Parse error: {}", e))
                .collect();
            return Err(MinifyError::backend_processing(NAME, errors.join("; ")));
        }

        let mut program = parse_result.program;
        let minifier_options = MinifierOptions {
            mangle: options.mangles().then(MangleOptions::default),
            compress: Some(Self::compress_options(options)),
        };
        let minified = Minifier::new(minifier_options).minify(&allocator, &mut program);

        let code = Codegen::new()
            .with_options(Self::codegen_options(options))
            .with_scoping(minified.scoping)
            .build(&program)
            .code;

        let mut output = BackendOutput::new(code);
        if options.mangle_variables && !options.is_aggressive() {
            output
                .warnings
                .push("mangleVariables is only applied at the aggressive level".to_string());
        }
        Ok(output)
    }
}
