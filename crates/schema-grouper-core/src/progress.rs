/// Trait for reporting scan and grouping progress.
///
/// The CLI implements it with an indicatif spinner. All methods have default
/// no-op implementations.
pub trait ProgressReporter {
    fn on_scan_start(&self, _candidates: usize) {}
    fn on_file_extracted(&self, _extracted: usize, _path: &str) {}
    fn on_file_failed(&self, _path: &str, _reason: &str) {}
    fn on_scan_complete(&self, _extracted: usize, _failed: usize, _duration_secs: f64) {}
    fn on_grouping_complete(&self, _groups: usize) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
