//! Progress reporter implementation
//!
//! Uses indicatif for the copy pass: a status line naming the current file,
//! a file count bar, and a byte bar with throughput.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bars for the copy pass
pub struct ProgressReporter {
    /// Multi-progress container
    multi: MultiProgress,
    /// Byte progress bar
    bytes_bar: ProgressBar,
    /// File count progress bar
    files_bar: ProgressBar,
    /// Current status message
    status: ProgressBar,
}

impl ProgressReporter {
    /// Create a progress reporter drawing to stderr
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Create a progress reporter drawing to `target`
    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);

        let status = multi.add(ProgressBar::new_spinner());
        status.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let files_bar = multi.add(ProgressBar::new(0));
        files_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%)")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        files_bar.set_prefix("Files");

        let bytes_bar = multi.add(ProgressBar::new(0));
        bytes_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.green/white}] {bytes}/{total_bytes} ({bytes_per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bytes_bar.set_prefix("Data ");

        Self {
            multi,
            bytes_bar,
            files_bar,
            status,
        }
    }

    /// Handle to the bar container, for printing lines above the bars
    pub fn multi(&self) -> MultiProgress {
        self.multi.clone()
    }

    /// Set total bytes to transfer
    pub fn set_total_bytes(&self, total: u64) {
        self.bytes_bar.set_length(total);
    }

    /// Set total files to transfer
    pub fn set_total_files(&self, total: u64) {
        self.files_bar.set_length(total);
    }

    /// Increment bytes copied
    pub fn increment_bytes(&self, bytes: u64) {
        self.bytes_bar.inc(bytes);
    }

    /// Increment files processed, copied or not
    pub fn increment_files(&self, count: u64) {
        self.files_bar.inc(count);
    }

    /// Set current status message
    pub fn set_status(&self, msg: &str) {
        self.status.set_message(msg.to_string());
    }

    /// Show the file currently being copied
    pub fn set_current_file(&self, name: &str) {
        let len = name.chars().count();
        let display = if len > 60 {
            let tail: String = name.chars().skip(len - 57).collect();
            format!("...{}", tail)
        } else {
            name.to_string()
        };
        self.status.set_message(display);
    }

    /// Finish progress with a final message
    pub fn finish(&self, message: &str) {
        self.status.finish_with_message(message.to_string());
        self.files_bar.finish();
        self.bytes_bar.finish();
    }

    /// Stop the bars where they are after a fatal error
    pub fn abandon(&self, message: &str) {
        self.status.abandon_with_message(message.to_string());
        self.files_bar.abandon();
        self.bytes_bar.abandon();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
