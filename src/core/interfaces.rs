use crate::core::models::*;
use crate::utils::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Text and diagnostics produced by an advanced backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendOutput {
    pub code: String,
    /// Non-fatal diagnostics, forwarded into the result's warnings
    pub warnings: Vec<String>,
}

impl BackendOutput {
    pub fn new(code: String) -> Self {
        Self {
            code,
            warnings: Vec::new(),
        }
    }
}

/// A higher-quality minifier that may be unavailable at runtime.
///
/// `load` is called at most once per successful handle initialization; a
/// failed load is retried on the next call.
pub trait MinifyBackend: Send + Sync + Sized + 'static {
    /// Short name used in logs and error messages
    fn name() -> &'static str;

    fn load() -> Result<Self>;

    fn minify(&self, content: &str, options: &MinificationOptions) -> Result<BackendOutput>;
}

/// File system operations interface
#[async_trait]
pub trait FileSystemService: Send + Sync {
    /// Source files under `path` (or `path` itself when it is a file)
    async fn discover_inputs(&self, path: &Path, recursive: bool) -> Result<Vec<PathBuf>>;
    async fn read_file(&self, path: &Path) -> Result<String>;
    async fn write_file(&self, path: &Path, content: &str) -> Result<()>;
    async fn create_directory(&self, path: &Path) -> Result<()>;
}
