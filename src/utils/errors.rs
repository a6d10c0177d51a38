use std::path::PathBuf;
use thiserror::Error;

/// Location details attached to content errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub code_snippet: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_snippet(mut self, snippet: String) -> Self {
        self.code_snippet = Some(snippet);
        self
    }
}

#[derive(Error, Debug)]
pub enum MinifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File is empty: {}", path.display())]
    EmptyFile { path: PathBuf },

    #[error("File too large: {} is {size} bytes (limit {limit} bytes)", path.display())]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Invalid JSON: {message}")]
    InvalidJson {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Failed to load {backend} backend: {message}")]
    BackendLoad {
        backend: &'static str,
        message: String,
    },

    #[error("{backend} backend failed: {message}")]
    BackendProcessing {
        backend: &'static str,
        message: String,
    },

    #[error("Cannot minify safely: {0}")]
    UnsafeInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MinifyError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn backend_load(backend: &'static str, message: impl Into<String>) -> Self {
        Self::BackendLoad {
            backend,
            message: message.into(),
        }
    }

    pub fn backend_processing(backend: &'static str, message: impl Into<String>) -> Self {
        Self::BackendProcessing {
            backend,
            message: message.into(),
        }
    }

    /// Build an `InvalidJson` error from a serde_json failure, keeping its position
    pub fn invalid_json(err: &serde_json::Error, source: &str) -> Self {
        let line = err.line();
        let context = (line > 0).then(|| {
            let snippet = source
                .lines()
                .nth(line - 1)
                .unwrap_or_default()
                .to_string();
            ErrorContext::new()
                .with_location(line, err.column())
                .with_snippet(snippet)
        });

        Self::InvalidJson {
            message: err.to_string(),
            context,
        }
    }

    /// Precondition violations stop the caller's workflow; everything else is recoverable
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::EmptyFile { .. } | Self::FileTooLarge { .. })
    }

    /// Format error with enhanced context display
    pub fn format_detailed(&self) -> String {
        match self {
            MinifyError::InvalidJson { message, context } => {
                let mut output = format!("Invalid JSON: {}", message);
                if let Some(ctx) = context {
                    if let (Some(line), Some(column)) = (ctx.line, ctx.column) {
                        output.push_str(&format!("\n  Location: line {}, column {}", line, column));
                    }
                    if let Some(ref snippet) = ctx.code_snippet {
                        output.push_str(&format!("\n  {:>4} | {}", ctx.line.unwrap_or(0), snippet));
                        if let Some(column) = ctx.column {
                            output.push_str(&format!(
                                "\n       | {}^",
                                " ".repeat(column.saturating_sub(1))
                            ));
                        }
                    }
                }
                output
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MinifyError>;

impl From<notify::Error> for MinifyError {
    fn from(err: notify::Error) -> Self {
        MinifyError::Watch(err.to_string())
    }
}
