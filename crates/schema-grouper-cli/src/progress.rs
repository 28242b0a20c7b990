use indicatif::{ProgressBar, ProgressStyle};
use schema_grouper_core::ProgressReporter;
use std::sync::Mutex;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using an indicatif bar over the candidate files.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, candidates: usize) {
        let pb = ProgressBar::new(candidates as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} Reading headers [{bar:30.cyan/dim}] {pos}/{len} files",
        ) {
            pb.set_style(style.progress_chars("━╸─").tick_chars(TICK_CHARS));
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn on_file_extracted(&self, _extracted: usize, _path: &str) {
        self.with_bar(|pb| pb.inc(1));
    }

    fn on_file_failed(&self, path: &str, reason: &str) {
        self.with_bar(|pb| {
            pb.inc(1);
            pb.println(format!("  \x1b[33m!\x1b[0m Skipped {}: {}", path, reason));
        });
    }

    fn on_scan_complete(&self, extracted: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} schemas, {} skipped in {:.2}s",
            extracted, failed, duration_secs
        );
    }

    fn on_grouping_complete(&self, groups: usize) {
        eprintln!("  \x1b[32m✓\x1b[0m Grouping complete: {} groups", groups);
    }
}
