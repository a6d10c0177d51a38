use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "codeshrink=warn",
            Verbosity::Normal => "codeshrink=info",
            Verbosity::Verbose => "codeshrink=debug",
        }
    }
}

pub struct Logger;

impl Logger {
    /// Install the global subscriber. `RUST_LOG` wins over the verbosity flag.
    /// Output goes to stderr so stdout stays usable for generated text and the stdio worker.
    pub fn init(verbosity: Verbosity) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

        // A second init (tests, embedding) is harmless
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }

    pub fn run_start(input: &str, file_count: usize) {
        info!("codeshrink: {} file(s) from {}", file_count, input);
    }

    pub fn processing_file(name: &str, language: &str) {
        debug!("Processing: {} ({})", name, language);
    }

    pub fn backend_loaded(name: &str) {
        info!("Loaded {} backend", name);
    }

    pub fn fallback(name: &str, reason: &str) {
        warn!("{} backend unavailable, using basic engine: {}", name, reason);
    }

    pub fn info(msg: &str) {
        info!("{}", msg);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn error(msg: &str) {
        error!("{}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("{}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
