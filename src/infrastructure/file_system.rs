use crate::core::content::generate_minified_filename;
use crate::core::interfaces::FileSystemService;
use crate::core::models::SupportedLanguage;
use crate::utils::{MinifyError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into during discovery
const SKIPPED_DIRS: [&str; 4] = [".git", "node_modules", "target", "dist"];

pub struct TokioFileSystemService;

#[async_trait::async_trait]
impl FileSystemService for TokioFileSystemService {
    async fn discover_inputs(&self, path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        let root = path.to_path_buf();
        tokio::task::spawn_blocking(move || discover_inputs_blocking(&root, recursive))
            .await
            .map_err(|e| MinifyError::Internal(format!("Discovery task failed: {}", e)))?
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).await.map_err(MinifyError::Io)
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_directory(parent).await?;
            }
        }

        fs::write(path, content).await.map_err(MinifyError::Io)
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await.map_err(MinifyError::Io)
    }
}

/// Minifiable files under `root`, sorted. A file root is returned as is.
/// Already minified files (`*.min.*`) are skipped so reruns don't feed on their own output.
pub fn discover_inputs_blocking(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(MinifyError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", root.display()),
        )));
    }

    let walker = WalkDir::new(root)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    let mut inputs = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| MinifyError::Io(e.into()))?;
        if entry.file_type().is_file() && is_minifiable(entry.path()) {
            inputs.push(entry.into_path());
        }
    }
    Ok(inputs)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}

pub fn is_minifiable(path: &Path) -> bool {
    let already_minified = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.contains(".min."))
        .unwrap_or(false);
    !already_minified && SupportedLanguage::from_path(path).is_some()
}

/// Where the minified copy of `input` goes.
///
/// Without an output the file is written next to its source with `.min` before the
/// extension. A single-file run treats the output as the target file; a directory
/// run treats it as a directory and mirrors the input layout underneath.
pub fn output_path_for(input: &Path, input_root: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        None => PathBuf::from(generate_minified_filename(&input.to_string_lossy())),
        Some(target) if input_root.is_file() || input == input_root => target.to_path_buf(),
        Some(dir) => {
            let relative = input
                .strip_prefix(input_root)
                .ok()
                .map(Path::to_path_buf)
                .or_else(|| input.file_name().map(PathBuf::from))
                .unwrap_or_else(|| input.to_path_buf());
            dir.join(relative)
        }
    }
}
