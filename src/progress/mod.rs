// Progress reporting. Advisory only: it never influences scheduling.
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} Running load test [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})";

/// Receives progress notifications from the batch scheduler.
pub trait ProgressReporter: Send + Sync {
    fn start(&self, total: u64);
    /// Called once per completed batch with the batch size.
    fn advance(&self, completed: u64);
    fn finish(&self);
}

/// Discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&self, _total: u64) {}
    fn advance(&self, _completed: u64) {}
    fn finish(&self) {}
}

/// Terminal progress bar drawn on stderr.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarProgress {
    fn start(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn advance(&self, completed: u64) {
        self.bar.inc(completed);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
