// Watch mode: re-minify source files when they change

use crate::infrastructure::file_system::is_minifiable;
use crate::utils::{Logger, MinifyError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Paths to watch for changes
    pub watch_paths: Vec<PathBuf>,
    pub recursive: bool,
    /// Quiet period after the last change before a rebuild runs
    pub debounce_ms: u64,
    pub verbose: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watch_paths: vec![PathBuf::from(".")],
            recursive: true,
            debounce_ms: 100,
            verbose: false,
        }
    }
}

/// File watcher that hands batches of changed source files to a callback
pub struct MinifyWatcher {
    config: WatchConfig,
}

impl MinifyWatcher {
    pub fn new(config: WatchConfig) -> Self {
        Self { config }
    }

    /// Block until Ctrl+C, calling `on_change` once per debounced batch
    pub async fn watch<F>(&self, mut on_change: F) -> Result<()>
    where
        F: FnMut(&[PathBuf]),
    {
        Logger::info("Watch mode started - monitoring for changes...");
        Logger::info(&format!(
            "   Watching: {}",
            self.config
                .watch_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        Logger::info("   Press Ctrl+C to stop");

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            notify::Config::default(),
        )?;

        let mode = if self.config.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        for path in &self.config.watch_paths {
            if !path.exists() {
                return Err(MinifyError::Watch(format!("{} does not exist", path.display())));
            }
            watcher.watch(path, mode)?;
        }

        self.process_events(rx, &mut on_change).await
    }

    async fn process_events<F>(&self, rx: Receiver<Event>, on_change: &mut F) -> Result<()>
    where
        F: FnMut(&[PathBuf]),
    {
        let mut changed_files = BTreeSet::new();
        let mut last_change_time = Instant::now();
        let debounce_duration = Duration::from_millis(self.config.debounce_ms);

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            let _ = shutdown_tx.send(()).await;
        });

        loop {
            if shutdown_rx.try_recv().is_ok() {
                Logger::info("Stopping watch mode...");
                break;
            }

            let next = tokio::task::block_in_place(|| rx.recv_timeout(Duration::from_millis(50)));
            match next {
                Ok(event) => {
                    for path in changed_sources(&event) {
                        if self.config.verbose {
                            Logger::debug(&format!("Changed: {}", path.display()));
                        }
                        changed_files.insert(path);
                        last_change_time = Instant::now();
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if !changed_files.is_empty() && last_change_time.elapsed() >= debounce_duration {
                        let batch: Vec<PathBuf> = std::mem::take(&mut changed_files).into_iter().collect();
                        Logger::info(&format!("Re-minifying {} changed file(s)", batch.len()));
                        on_change(&batch);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    Logger::warn("Watch channel disconnected");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Source files touched by `event`; metadata events and our own outputs are ignored
pub fn changed_sources(event: &Event) -> Vec<PathBuf> {
    if matches!(event.kind, EventKind::Access(_) | EventKind::Other | EventKind::Remove(_)) {
        return Vec::new();
    }
    event
        .paths
        .iter()
        .filter(|path| !is_ignored_path(path) && is_minifiable(path))
        .cloned()
        .collect()
}

fn is_ignored_path(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    path_str.contains(".git")
        || path_str.contains("node_modules")
        || path_str.ends_with('~')
        || path_str.ends_with(".swp")
        || path_str.contains(".tmp")
}
