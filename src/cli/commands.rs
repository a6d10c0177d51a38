use crate::core::content::{
    detect_language_for_path, estimate_minification_potential, format_file_size, validate_content,
    validate_file,
};
use crate::core::interfaces::FileSystemService;
use crate::core::models::*;
use crate::infrastructure::{output_path_for, serve_stdio, AdvancedMinifier, TokioFileSystemService};
use crate::projection::ProjectionTarget;
use crate::utils::{
    ConfigFile, ConfigLoader, FileReport, Logger, MinificationProfiler, MinifyError, MinifyUI,
    MinifyWatcher, Result, RunSummary, Timer, Verbosity, WatchConfig,
};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "codeshrink", version)]
#[command(about = "Multi-language code minifier")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a build-tool artifact for the given options
    Generate {
        #[arg(value_enum)]
        target: ProjectionTarget,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Show the detected language and pre-flight checks for a file
    Detect { file: PathBuf },
    /// Serve minification requests as JSON lines on stdin/stdout
    Worker,
}

/// Flags shared by a minification run and `generate`
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// File or directory to minify
    #[arg(short, long)]
    pub input: Option<String>,
    /// Output file, or directory for directory input
    #[arg(short, long)]
    pub output: Option<String>,
    /// light | moderate | aggressive
    #[arg(short, long)]
    pub level: Option<MinificationLevel>,
    /// Override language detection
    #[arg(short = 'L', long)]
    pub language: Option<SupportedLanguage>,
    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,
    /// Re-minify when sources change
    #[arg(short, long)]
    pub watch: bool,
    /// JSON config file (default: codeshrink.config.json when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub keep_comments: bool,
    #[arg(long)]
    pub keep_whitespace: bool,
    /// Shorten declared names; aggressive level only and unsafe for dynamic code
    #[arg(long)]
    pub mangle_variables: bool,
    #[arg(long)]
    pub remove_console: bool,
    #[arg(long)]
    pub keep_debugger: bool,
    #[arg(long)]
    pub preserve_linebreaks: bool,
    #[arg(long)]
    pub keep_empty_lines: bool,
}

impl RunArgs {
    /// Only what was actually given on the command line
    pub fn overrides(&self) -> ConfigFile {
        fn set(flag: bool, value: bool) -> Option<bool> {
            flag.then_some(value)
        }

        ConfigFile {
            input: self.input.clone(),
            output: self.output.clone(),
            language: self.language,
            level: self.level,
            recursive: set(self.recursive, true),
            watch: set(self.watch, true),
            remove_comments: set(self.keep_comments, false),
            remove_whitespace: set(self.keep_whitespace, false),
            remove_empty_lines: set(self.keep_empty_lines, false),
            preserve_line_breaks: set(self.preserve_linebreaks, true),
            mangle_variables: set(self.mangle_variables, true),
            remove_console_log: set(self.remove_console, true),
            remove_debugger: set(self.keep_debugger, false),
        }
    }

    /// CLI > config file > default
    pub fn resolve(&self, root: &Path) -> Result<CliConfig> {
        let file_config = ConfigLoader::load(self.config.as_deref(), root)?;
        Ok(ConfigLoader::merge_with_cli(file_config, self.overrides()))
    }
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        let cli = Cli::parse();
        let verbosity = if cli.quiet {
            Verbosity::Quiet
        } else if cli.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Logger::init(verbosity);

        match cli.command {
            Some(Commands::Generate { target, run }) => self.handle_generate_command(target, &run).await,
            Some(Commands::Detect { file }) => self.handle_detect_command(&file),
            Some(Commands::Worker) => self.handle_worker_command().await,
            None => self.handle_minify_command(&cli.run, verbosity).await,
        }
    }

    async fn handle_minify_command(&self, args: &RunArgs, verbosity: Verbosity) -> Result<()> {
        let config = args.resolve(Path::new("."))?;
        if config.input.is_empty() {
            return Err(MinifyError::config("No input given; pass --input <PATH>"));
        }

        let root = PathBuf::from(&config.input);
        let inputs = TokioFileSystemService
            .discover_inputs(&root, config.recursive)
            .await?;
        Logger::run_start(&config.input, inputs.len());
        if inputs.is_empty() {
            Logger::warn(&format!("No supported source files found in {}", config.input));
        }

        let ui = MinifyUI::new();
        let show = verbosity != Verbosity::Quiet;
        if show {
            ui.show_banner();
        }

        let profiler = MinificationProfiler::new();
        let summary = tokio::task::block_in_place(|| {
            minify_batch(&inputs, &root, &config, AdvancedMinifier::global(), &profiler)
        })?;

        if show {
            for report in &summary.files {
                ui.show_file(report);
            }
            ui.show_completion(&summary, Some(&profiler.summary()));
        }

        if config.watch {
            self.watch(&root, &config).await?;
        }
        Ok(())
    }

    async fn watch(&self, root: &Path, config: &CliConfig) -> Result<()> {
        let canonical_root = std::fs::canonicalize(root)?;
        let output_dir = config
            .output
            .as_ref()
            .and_then(|output| std::fs::canonicalize(output).ok())
            .filter(|output| output.is_dir());

        let watcher = MinifyWatcher::new(WatchConfig {
            watch_paths: vec![root.to_path_buf()],
            recursive: config.recursive,
            verbose: false,
            ..Default::default()
        });

        watcher
            .watch(|changed| {
                let files: Vec<PathBuf> = changed
                    .iter()
                    .filter(|path| output_dir.as_ref().map_or(true, |dir| !path.starts_with(dir)))
                    .map(|path| {
                        if root.is_file() {
                            root.to_path_buf()
                        } else {
                            path.strip_prefix(&canonical_root)
                                .map(|relative| root.join(relative))
                                .unwrap_or_else(|_| path.clone())
                        }
                    })
                    .collect();

                let profiler = MinificationProfiler::new();
                match minify_batch(&files, root, config, AdvancedMinifier::global(), &profiler) {
                    Ok(summary) => Logger::info(&format!(
                        "Rebuilt {} file(s): {}",
                        summary.files.len(),
                        summary.totals()
                    )),
                    Err(e) => Logger::error(&format!("Rebuild failed: {}", e)),
                }
            })
            .await
    }

    async fn handle_generate_command(&self, target: ProjectionTarget, args: &RunArgs) -> Result<()> {
        let config = args.resolve(Path::new("."))?;

        let files = if target == ProjectionTarget::Batch && !config.input.is_empty() {
            let root = Path::new(&config.input);
            if root.exists() {
                TokioFileSystemService
                    .discover_inputs(root, config.recursive)
                    .await?
                    .into_iter()
                    .map(|path| path.to_string_lossy().into_owned())
                    .collect()
            } else {
                vec![config.input.clone()]
            }
        } else {
            Vec::new()
        };

        print!("{}", ensure_trailing_newline(target.render(&config, &files)));
        Ok(())
    }

    fn handle_detect_command(&self, file: &Path) -> Result<()> {
        let size = validate_file(file)?;
        let content = std::fs::read_to_string(file)?;
        let language = detect_language_for_path(file, &content);
        let validation = validate_content(&content, language);

        println!("file:      {}", file.display());
        println!("size:      {}", format_file_size(size));
        println!("language:  {} ({})", language, language.mime_type());
        println!(
            "potential: ~{}%",
            estimate_minification_potential(&content, language)
        );
        for error in &validation.errors {
            println!("error:     {}", error);
        }
        for warning in &validation.warnings {
            println!("warning:   {}", warning);
        }
        Ok(())
    }

    async fn handle_worker_command(&self) -> Result<()> {
        let answered = tokio::task::spawn_blocking(serve_stdio)
            .await
            .map_err(|e| MinifyError::Internal(format!("Worker task failed: {}", e)))??;
        Logger::debug(&format!("Worker answered {} request(s)", answered));
        Ok(())
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Minify every file in parallel.
///
/// All files are validated before any is touched; an empty or oversized file
/// aborts the whole batch. Failures after that are per file and reported.
pub fn minify_batch(
    inputs: &[PathBuf],
    root: &Path,
    config: &CliConfig,
    minifier: &AdvancedMinifier,
    profiler: &MinificationProfiler,
) -> Result<RunSummary> {
    let _timer = Timer::start("minify batch");
    for input in inputs {
        validate_file(input)?;
    }

    let reports: Vec<Result<FileReport>> = inputs
        .par_iter()
        .map(|input| minify_file(input, root, config, minifier, profiler))
        .collect();

    let mut summary = RunSummary::default();
    for report in reports {
        summary.push(report?);
    }
    Ok(summary)
}

/// Read, minify and write one file. A failed minification leaves the output unwritten.
pub fn minify_file(
    input: &Path,
    root: &Path,
    config: &CliConfig,
    minifier: &AdvancedMinifier,
    profiler: &MinificationProfiler,
) -> Result<FileReport> {
    let name = input.display().to_string();
    let content = std::fs::read_to_string(input)?;
    let language = config
        .language
        .unwrap_or_else(|| detect_language_for_path(input, &content));
    Logger::processing_file(&name, language.as_str());

    profiler.start(&name, content.len() as u64);
    let result = minifier.minify(&content, language, &config.options);
    profiler.end(&name);

    let error = result.errors.first().cloned();
    if error.is_none() {
        let output = output_path_for(input, root, config.output.as_deref().map(Path::new));
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&output, &result.minified)?;
        Logger::debug(&format!("Wrote {}", output.display()));
    }

    Ok(FileReport {
        name,
        language,
        original_size: result.original_size as u64,
        minified_size: result.minified_size as u64,
        warnings: result.warnings,
        error,
    })
}
