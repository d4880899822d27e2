// file: src/pipeline/progress.rs
// description: per-table progress reporting and run statistics
// reference: uses indicatif for progress bars

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub tables_succeeded: usize,
    pub tables_failed: usize,
    pub duration_secs: u64,
}

impl RunStats {
    pub fn success_rate(&self) -> f64 {
        let total = self.tables_succeeded + self.tables_failed;
        if total == 0 {
            return 0.0;
        }
        (self.tables_succeeded as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    bar: ProgressBar,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_tables: usize) -> Self {
        Self::with_color(total_tables, true)
    }

    pub fn with_color(total_tables: usize, colored: bool) -> Self {
        let bar = ProgressBar::new(total_tables as u64);
        if colored {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )
                    .expect("Failed to create progress bar template")
                    .progress_chars("█▓▒░"),
            );
        } else {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")
                    .expect("Failed to create progress bar template")
                    .progress_chars("=>-"),
            );
        }

        Self {
            bar,
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
    }

    pub fn set_message(&self, message: String) {
        self.bar.set_message(message);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Run complete");
    }

    pub fn get_stats(&self) -> RunStats {
        RunStats {
            tables_succeeded: self.succeeded.load(Ordering::SeqCst),
            tables_failed: self.failed.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let stats = RunStats {
            tables_succeeded: 9,
            tables_failed: 1,
            duration_secs: 3,
        };
        assert!((stats.success_rate() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_success_rate_with_no_tables() {
        assert_eq!(RunStats::default().success_rate(), 0.0);
    }

    #[test]
    fn test_tracker_counts() {
        let tracker = ProgressTracker::with_color(3, false);
        tracker.inc_succeeded();
        tracker.inc_succeeded();
        tracker.inc_failed();

        let stats = tracker.get_stats();
        assert_eq!(stats.tables_succeeded, 2);
        assert_eq!(stats.tables_failed, 1);
    }
}
