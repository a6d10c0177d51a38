use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Timing of one finished minification
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSample {
    pub id: String,
    pub size: u64,
    pub duration: Duration,
    /// Bytes per second
    pub throughput: f64,
}

impl ProfileSample {
    fn new(id: String, size: u64, duration: Duration) -> Self {
        // A zero duration would divide by zero on very small inputs
        let seconds = duration.as_secs_f64().max(1e-9);
        Self {
            id,
            size,
            duration,
            throughput: size as f64 / seconds,
        }
    }
}

/// Wall-clock profiler keyed by request or file id.
///
/// Used for per-batch performance reporting only; nothing functional depends on it.
#[derive(Default)]
pub struct MinificationProfiler {
    active: Mutex<HashMap<String, (Instant, u64)>>,
    samples: Mutex<Vec<ProfileSample>>,
}

impl MinificationProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, id: &str, size: u64) {
        self.active.lock().insert(id.to_string(), (Instant::now(), size));
    }

    /// Stop the timer for `id`. Returns `None` when `start` was never called for it.
    pub fn end(&self, id: &str) -> Option<ProfileSample> {
        let (started, size) = self.active.lock().remove(id)?;
        let sample = ProfileSample::new(id.to_string(), size, started.elapsed());
        self.samples.lock().push(sample.clone());
        Some(sample)
    }

    pub fn in_flight(&self) -> usize {
        self.active.lock().len()
    }

    pub fn summary(&self) -> ProfileSummary {
        let samples = self.samples.lock();
        let total_bytes: u64 = samples.iter().map(|s| s.size).sum();
        let total_duration: Duration = samples.iter().map(|s| s.duration).sum();
        let slowest = samples.iter().max_by_key(|s| s.duration).cloned();

        ProfileSummary {
            count: samples.len(),
            total_bytes,
            total_duration,
            throughput: if samples.is_empty() {
                0.0
            } else {
                total_bytes as f64 / total_duration.as_secs_f64().max(1e-9)
            },
            slowest,
        }
    }

    pub fn reset(&self) {
        self.active.lock().clear();
        self.samples.lock().clear();
    }
}

/// Aggregate over every finished sample
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub count: usize,
    pub total_bytes: u64,
    pub total_duration: Duration,
    /// Bytes per second across the batch
    pub throughput: f64,
    pub slowest: Option<ProfileSample>,
}

impl fmt::Display for ProfileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s), {} bytes in {:.2?} ({:.1} KB/s)",
            self.count,
            self.total_bytes,
            self.total_duration,
            self.throughput / 1024.0
        )?;
        if let Some(slowest) = &self.slowest {
            write!(f, ", slowest {} ({:.2?})", slowest.id, slowest.duration)?;
        }
        Ok(())
    }
}
