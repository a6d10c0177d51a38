//! Multi-language code minifier.
//!
//! The [`core`] layer holds the option model, content heuristics and the
//! rule-based engine; [`infrastructure`] adds the optional advanced backends,
//! the background worker and file discovery; [`projection`] renders options
//! into build-tool artifacts.

pub mod cli;
pub mod core;
pub mod infrastructure;
pub mod projection;
pub mod utils;

pub use crate::core::content::{
    calculate_savings, detect_language, detect_language_for_path, format_file_size,
    validate_content, validate_file,
};
pub use crate::core::engine::{
    minify, minify_css, minify_generic, minify_html, minify_js, minify_json, minify_xml,
};
pub use crate::core::models::{
    CliConfig, CompressionStats, FileValidationResult, MinificationLevel, MinificationOptions,
    MinificationResult, SupportedLanguage,
};
pub use crate::infrastructure::processors::AdvancedMinifier;
pub use crate::infrastructure::worker::{WorkerClient, WorkerError};
pub use crate::projection::ProjectionTarget;
pub use crate::utils::{MinifyError, Result};
