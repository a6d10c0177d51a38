use super::{guarded, Transformed};
use crate::core::models::{MinificationOptions, MinificationResult};
use crate::utils::MinifyError;

/// Minify JSON by parsing and re-serializing it compactly.
///
/// Key order is preserved. Invalid JSON is never stripped textually; the
/// original comes back with the parse error recorded.
pub fn minify_json(content: &str, options: &MinificationOptions) -> MinificationResult {
    guarded("JSON", content, options, |content, _| {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| MinifyError::invalid_json(&e, content))?;
        let code = serde_json::to_string(&value)
            .map_err(|e| MinifyError::Internal(format!("JSON serialization failed: {}", e)))?;
        Ok(Transformed::new(code))
    })
}
