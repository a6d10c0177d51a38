use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Every language the engine knows how to shrink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    Html,
    Css,
    Javascript,
    Typescript,
    Json,
    Xml,
    Php,
    Python,
    Java,
    C,
    Cpp,
    Csharp,
    Go,
    Rust,
    Swift,
    Kotlin,
    Dart,
    Scala,
    Ruby,
    Perl,
    R,
    Matlab,
    Sql,
    Shell,
    Powershell,
}

/// Comment grammar used by the generic engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `<!-- -->`
    Markup,
    /// `/* */` and `//`
    CFamily,
    /// `/* */`, `//` and `#`
    Php,
    /// `#`
    Hash,
    /// `#` and `<# #>`
    PowerShell,
    /// `--` and `/* */`
    Sql,
    /// `%` and `%{ %}`
    Matlab,
    None,
}

/// How much line structure a language needs to survive minification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSensitivity {
    /// Newlines are plain whitespace
    FreeForm,
    /// Newlines terminate statements
    Lines,
    /// Newlines and leading indentation are both significant
    Indentation,
}

impl SupportedLanguage {
    pub const ALL: [SupportedLanguage; 25] = [
        Self::Html,
        Self::Css,
        Self::Javascript,
        Self::Typescript,
        Self::Json,
        Self::Xml,
        Self::Php,
        Self::Python,
        Self::Java,
        Self::C,
        Self::Cpp,
        Self::Csharp,
        Self::Go,
        Self::Rust,
        Self::Swift,
        Self::Kotlin,
        Self::Dart,
        Self::Scala,
        Self::Ruby,
        Self::Perl,
        Self::R,
        Self::Matlab,
        Self::Sql,
        Self::Shell,
        Self::Powershell,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Php => "php",
            Self::Python => "python",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Csharp => "csharp",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Dart => "dart",
            Self::Scala => "scala",
            Self::Ruby => "ruby",
            Self::Perl => "perl",
            Self::R => "r",
            Self::Matlab => "matlab",
            Self::Sql => "sql",
            Self::Shell => "shell",
            Self::Powershell => "powershell",
        }
    }

    /// File extensions, primary first
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Html => &["html", "htm"],
            Self::Css => &["css"],
            Self::Javascript => &["js", "mjs", "cjs", "jsx"],
            Self::Typescript => &["ts", "tsx", "mts", "cts"],
            Self::Json => &["json"],
            Self::Xml => &["xml", "svg", "xsd", "xsl"],
            Self::Php => &["php"],
            Self::Python => &["py", "pyw"],
            Self::Java => &["java"],
            Self::C => &["c", "h"],
            Self::Cpp => &["cpp", "cc", "cxx", "hpp", "hh"],
            Self::Csharp => &["cs"],
            Self::Go => &["go"],
            Self::Rust => &["rs"],
            Self::Swift => &["swift"],
            Self::Kotlin => &["kt", "kts"],
            Self::Dart => &["dart"],
            Self::Scala => &["scala", "sc"],
            Self::Ruby => &["rb"],
            Self::Perl => &["pl", "pm"],
            Self::R => &["r"],
            Self::Matlab => &["m"],
            Self::Sql => &["sql"],
            Self::Shell => &["sh", "bash", "zsh"],
            Self::Powershell => &["ps1", "psm1"],
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Css => "text/css",
            Self::Javascript => "text/javascript",
            Self::Typescript => "application/typescript",
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Php => "application/x-httpd-php",
            Self::Python => "text/x-python",
            Self::Java => "text/x-java-source",
            Self::C => "text/x-c",
            Self::Cpp => "text/x-c++src",
            Self::Csharp => "text/x-csharp",
            Self::Go => "text/x-go",
            Self::Rust => "text/x-rust",
            Self::Swift => "text/x-swift",
            Self::Kotlin => "text/x-kotlin",
            Self::Dart => "application/dart",
            Self::Scala => "text/x-scala",
            Self::Ruby => "text/x-ruby",
            Self::Perl => "text/x-perl",
            Self::R => "text/x-r",
            Self::Matlab => "text/x-matlab",
            Self::Sql => "application/sql",
            Self::Shell => "application/x-sh",
            Self::Powershell => "application/x-powershell",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn comment_style(&self) -> CommentStyle {
        match self {
            Self::Html | Self::Xml => CommentStyle::Markup,
            Self::Css
            | Self::Javascript
            | Self::Typescript
            | Self::Java
            | Self::C
            | Self::Cpp
            | Self::Csharp
            | Self::Go
            | Self::Rust
            | Self::Swift
            | Self::Kotlin
            | Self::Dart
            | Self::Scala => CommentStyle::CFamily,
            Self::Php => CommentStyle::Php,
            Self::Python | Self::Ruby | Self::Perl | Self::R | Self::Shell => CommentStyle::Hash,
            Self::Powershell => CommentStyle::PowerShell,
            Self::Sql => CommentStyle::Sql,
            Self::Matlab => CommentStyle::Matlab,
            Self::Json => CommentStyle::None,
        }
    }

    pub fn line_sensitivity(&self) -> LineSensitivity {
        match self {
            Self::Python => LineSensitivity::Indentation,
            Self::Ruby
            | Self::R
            | Self::Matlab
            | Self::Shell
            | Self::Powershell
            | Self::Go
            | Self::Swift
            | Self::Kotlin
            | Self::Scala
            | Self::C
            | Self::Cpp
            | Self::Csharp => LineSensitivity::Lines,
            _ => LineSensitivity::FreeForm,
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportedLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let alias = match lowered.as_str() {
            "js" => "javascript",
            "ts" => "typescript",
            "c++" => "cpp",
            "c#" | "cs" => "csharp",
            "py" => "python",
            "rb" => "ruby",
            "sh" | "bash" => "shell",
            "ps1" => "powershell",
            other => other,
        };
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.as_str() == alias)
            .ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

/// Aggressiveness tier, ordered light < moderate < aggressive
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MinificationLevel {
    Light,
    #[default]
    Moderate,
    Aggressive,
}

impl MinificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for MinificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MinificationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(format!("Unknown minification level: {}", s)),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Knobs for a single minification call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinificationOptions {
    #[serde(default)]
    pub level: MinificationLevel,
    #[serde(default = "default_true")]
    pub remove_comments: bool,
    #[serde(default = "default_true")]
    pub remove_whitespace: bool,
    #[serde(default = "default_true")]
    pub remove_empty_lines: bool,
    #[serde(default)]
    pub preserve_line_breaks: bool,
    /// Only honoured at `level = aggressive`
    #[serde(default)]
    pub mangle_variables: bool,
    #[serde(default)]
    pub remove_console_log: bool,
    #[serde(default = "default_true")]
    pub remove_debugger: bool,
}

impl Default for MinificationOptions {
    fn default() -> Self {
        Self {
            level: MinificationLevel::Moderate,
            remove_comments: true,
            remove_whitespace: true,
            remove_empty_lines: true,
            preserve_line_breaks: false,
            mangle_variables: false,
            remove_console_log: false,
            remove_debugger: true,
        }
    }
}

impl MinificationOptions {
    pub fn with_level(mut self, level: MinificationLevel) -> Self {
        self.level = level;
        self
    }

    pub fn is_aggressive(&self) -> bool {
        self.level == MinificationLevel::Aggressive
    }

    /// Name mangling runs only when both the flag and the aggressive level are set
    pub fn mangles(&self) -> bool {
        self.mangle_variables && self.is_aggressive()
    }
}

/// Outcome of one minification call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinificationResult {
    pub minified: String,
    /// Byte length of the input
    pub original_size: usize,
    /// Byte length of `minified`
    pub minified_size: usize,
    pub compression_ratio: f64,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl MinificationResult {
    pub fn new(original: &str, minified: String, warnings: Vec<String>) -> Self {
        let original_size = original.len();
        let minified_size = minified.len();
        Self {
            minified,
            original_size,
            minified_size,
            compression_ratio: compression_ratio(original_size, minified_size),
            errors: Vec::new(),
            warnings,
        }
    }

    /// A failed call: the original text comes back untouched
    pub fn failed(original: &str, error: impl Into<String>) -> Self {
        Self {
            minified: original.to_string(),
            original_size: original.len(),
            minified_size: original.len(),
            compression_ratio: 1.0,
            errors: vec![error.into()],
            warnings: Vec::new(),
        }
    }

    pub fn unchanged(original: &str) -> Self {
        Self::new(original, original.to_string(), Vec::new())
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn stats(&self) -> CompressionStats {
        CompressionStats::new(self.original_size as u64, self.minified_size as u64)
    }
}

/// originalSize / minifiedSize. Empty input is 1 by convention; when everything was
/// stripped the denominator is treated as one byte.
pub fn compression_ratio(original_size: usize, minified_size: usize) -> f64 {
    match (original_size, minified_size) {
        (0, _) => 1.0,
        (original, 0) => original as f64,
        (original, minified) => original as f64 / minified as f64,
    }
}

/// Structural pre-check outcome
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl FileValidationResult {
    pub fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Derived savings figures. `savings` and `percentage` go negative when output grew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionStats {
    pub original_size: u64,
    pub minified_size: u64,
    pub savings: i64,
    pub percentage: i64,
}

impl CompressionStats {
    pub fn new(original_size: u64, minified_size: u64) -> Self {
        let savings = original_size as i64 - minified_size as i64;
        let percentage = if original_size == 0 {
            0
        } else {
            (savings as f64 / original_size as f64 * 100.0).round() as i64
        };
        Self {
            original_size,
            minified_size,
            savings,
            percentage,
        }
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% reduction ({} -> {} bytes, saved {})",
            self.percentage, self.original_size, self.minified_size, self.savings
        )
    }
}

/// Everything a generated invocation needs: the options plus where to read and write
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    #[serde(default)]
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<SupportedLanguage>,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub watch: bool,
    #[serde(flatten)]
    pub options: MinificationOptions,
}

impl CliConfig {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: MinificationLevel) -> Self {
        self.options.level = level;
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }
}
