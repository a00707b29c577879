use colored::Colorize;
use std::time::Duration;

use crate::domain::entities::{ApplyOutcome, OutcomeStatus, RunReport};

/// Display utilities for the CLI interface
pub struct DisplayHelper {
    pub use_color: bool,
}

impl DisplayHelper {
    /// Create a new DisplayHelper
    pub fn new(use_color: bool) -> Self {
        colored::control::set_override(use_color);
        Self { use_color }
    }

    /// Color only when stdout is a terminal and `NO_COLOR` is unset
    pub fn auto_display() -> Self {
        Self::new(atty::is(atty::Stream::Stdout) && std::env::var_os("NO_COLOR").is_none())
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.format_error(message));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "⚠".yellow().bold(), message);
        } else {
            eprintln!("[WARNING] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "::".blue().bold(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    pub fn format_error(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "✗".red().bold(), message)
        } else {
            format!("[ERROR] {}", message)
        }
    }

    /// Format a file path with appropriate styling
    pub fn format_path(&self, path: &str) -> String {
        if self.use_color {
            path.cyan().to_string()
        } else {
            format!("'{}'", path)
        }
    }

    /// Format duration in human-readable format
    pub fn format_duration(&self, duration: Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else if total_secs > 0 {
            format!("{}.{:02}s", total_secs, duration.subsec_millis() / 10)
        } else {
            format!("{}ms", duration.as_millis())
        }
    }

    /// One line for a failed operation
    pub fn format_failure(&self, outcome: &ApplyOutcome) -> String {
        let label = match outcome.status {
            OutcomeStatus::SkippedEnsureFailed => "skipped",
            OutcomeStatus::Cancelled => "cancelled",
            _ => "failed",
        };
        let target = if self.use_color {
            outcome.target().bold().to_string()
        } else {
            outcome.target()
        };
        format!(
            "{} ({}): {}",
            target,
            label,
            outcome.error_message.as_deref().unwrap_or("unknown error")
        )
    }

    /// Print the failures of a run followed by its summary line
    pub fn print_report(&self, report: &RunReport) {
        let failures = report.failed_outcomes();
        if !failures.is_empty() {
            self.warning(&format!("{} operation(s) failed", failures.len()));
            for outcome in failures {
                self.error(&self.format_failure(outcome));
            }
        }

        if let Some(ms) = report.elapsed_ms() {
            let elapsed = Duration::from_millis(ms.max(0) as u64);
            self.info(&format!("Finished in {}", self.format_duration(elapsed)));
        }

        let summary = report.summary_line();
        if !self.use_color {
            println!("{}", summary);
        } else if report.has_failures() {
            println!("{}", summary.red().bold());
        } else {
            println!("{}", summary.green().bold());
        }
    }
}
