//! Console output.
//!
//! Progress and status go to stderr so stdout stays clean for paths and
//! JSON.

use std::io::{Write, stderr};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::QueueableCommand;
use crossterm::cursor::MoveToColumn;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use vaultup_core::Reporter;
use vaultup_schema::Version;

/// Reporter that renders to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    quiet: bool,
    progress_open: AtomicBool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            progress_open: AtomicBool::new(false),
        }
    }

    /// Finish an in-place progress line before printing anything else.
    fn end_progress(&self) {
        if self.progress_open.swap(false, Ordering::Relaxed) {
            eprintln!();
        }
    }

    fn line(&self, msg: &str) {
        if self.quiet {
            return;
        }
        self.end_progress();
        eprintln!("{msg}");
    }
}

impl Reporter for ConsoleReporter {
    fn downloading(&self, version: &Version, current: u64, total: Option<u64>) {
        if self.quiet {
            return;
        }
        let mut err = stderr();
        let _ = err.queue(MoveToColumn(0));
        let _ = err.queue(Clear(ClearType::CurrentLine));
        let _ = write!(
            err,
            "  {} vault {version}  {}",
            "fetching".cyan(),
            format_progress(current, total).dark_grey()
        );
        let _ = err.flush();
        self.progress_open.store(true, Ordering::Relaxed);
    }

    fn extracting(&self, version: &Version) {
        self.line(&format!("  {} vault {version}", "unpacking".cyan()));
    }

    fn linked(&self, link: &Path, target: &Path) {
        self.line(&format!(
            "  {} {} -> {}",
            "linked".green(),
            link.display(),
            target.display()
        ));
    }

    fn removed(&self, version: &Version) {
        self.line(&format!("  {} vault {version}", "removed".green().bold()));
    }

    fn done(&self, version: &Version, detail: &str) {
        self.line(&format!("  {} vault {version} {}", "✓".green(), detail.dark_grey()));
    }

    fn warning(&self, msg: &str) {
        // Warnings are shown even in quiet mode.
        self.end_progress();
        eprintln!("  {} {msg}", "warning:".yellow().bold());
    }

    fn info(&self, msg: &str) {
        self.line(&format!("  {msg}"));
    }
}

/// `1.2 MiB / 80.0 MiB`, or just the current size when the total is unknown.
pub fn format_progress(current: u64, total: Option<u64>) -> String {
    match total.filter(|&t| t > 0) {
        Some(total) => format!("{} / {}", format_size(current), format_size(total)),
        None => format_size(current),
    }
}

#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}
