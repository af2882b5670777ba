//! Download progress display.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::ProgressHandle;

/// A byte progress bar for the bundle transfer.
pub struct DownloadProgress {
    bar: ProgressBar,
}

impl DownloadProgress {
    /// Create a progress bar for a transfer of `total` bytes.
    pub fn new(label: &str, total: u64) -> Self {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
            .map(|style| style.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message(label.to_string());

        Self { bar }
    }

    /// Create a progress bar that doesn't show (unknown length or quiet mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Bytes recorded so far.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressHandle for DownloadProgress {
    fn advance(&mut self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn finish(&mut self) {
        // Leaves no partial line behind for the next status message.
        self.bar.finish_and_clear();
    }
}

/// Format a byte count for display.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_small() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
    }

    #[test]
    fn format_bytes_scaled() {
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(30 * 1024 * 1024), "30.0 MiB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GiB");
    }

    #[test]
    fn format_duration_milliseconds() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn format_duration_seconds() {
        assert_eq!(format_duration(Duration::from_secs_f64(5.3)), "5.3s");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }

    #[test]
    fn hidden_progress_still_counts() {
        let mut progress = DownloadProgress::hidden();
        progress.advance(100);
        progress.advance(28);
        assert_eq!(progress.position(), 128);
        progress.finish();
    }

    #[test]
    fn visible_progress_counts() {
        let mut progress = DownloadProgress::new("bundle.zip", 1000);
        progress.advance(400);
        assert_eq!(progress.position(), 400);
        progress.finish();
    }
}
