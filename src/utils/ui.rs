use crate::core::content::{calculate_savings, format_file_size};
use crate::core::models::{CompressionStats, SupportedLanguage};
use crate::utils::ProfileSummary;
use colored::*;
use std::time::Instant;

/// Outcome of one file in a run
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub name: String,
    pub language: SupportedLanguage,
    pub original_size: u64,
    pub minified_size: u64,
    pub warnings: Vec<String>,
    /// Set when the file came back unchanged because minification failed
    pub error: Option<String>,
}

impl FileReport {
    pub fn stats(&self) -> CompressionStats {
        calculate_savings(self.original_size, self.minified_size)
    }
}

/// Every file of a run, in processing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn push(&mut self, report: FileReport) {
        self.files.push(report);
    }

    pub fn totals(&self) -> CompressionStats {
        let original: u64 = self.files.iter().map(|f| f.original_size).sum();
        let minified: u64 = self.files.iter().map(|f| f.minified_size).sum();
        calculate_savings(original, minified)
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }
}

pub struct MinifyUI {
    start_time: Instant,
}

impl MinifyUI {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn show_banner(&self) {
        println!(
            "\n  {} {}",
            "CODESHRINK".bright_cyan().bold(),
            concat!("v", env!("CARGO_PKG_VERSION")).bright_white()
        );
        println!();
    }

    pub fn show_file(&self, report: &FileReport) {
        if let Some(error) = &report.error {
            println!(
                "  {} {} {}",
                "✗".bright_red(),
                report.name.bright_white(),
                error.bright_red()
            );
            return;
        }

        let stats = report.stats();
        println!(
            "  {} {} {} {} {}",
            "✓".bright_green(),
            report.name.bright_cyan(),
            format!("[{}]", report.language).bright_black(),
            format!(
                "{} → {}",
                format_file_size(report.original_size),
                format_file_size(report.minified_size)
            )
            .bright_white(),
            format!("({}%)", -stats.percentage).bright_green()
        );
        for warning in &report.warnings {
            println!("    {} {}", "⚠".bright_yellow(), warning.bright_black());
        }
    }

    pub fn show_completion(&self, summary: &RunSummary, profile: Option<&ProfileSummary>) {
        let elapsed = self.start_time.elapsed();
        let totals = summary.totals();

        println!();
        println!(
            "  {} {} saved across {} file(s) ({}%)",
            "Σ".bright_cyan(),
            format_file_size(totals.savings.max(0) as u64).bright_white().bold(),
            summary.files.len(),
            totals.percentage
        );
        if summary.failed() > 0 {
            println!(
                "  {} {} file(s) left unchanged",
                "!".bright_red(),
                summary.failed().to_string().bright_red().bold()
            );
        }
        if let Some(profile) = profile {
            println!("  {} {}", "⏱".bright_black(), profile.to_string().bright_black());
        }
        println!(
            "  {} done in {}",
            "✓".bright_green(),
            format!("{:.0}ms", elapsed.as_secs_f64() * 1000.0).bright_white().bold()
        );
    }
}

impl Default for MinifyUI {
    fn default() -> Self {
        Self::new()
    }
}
