//! CLI-specific progress handling for https-dwnld
//!
//! Draws the download bar with indicatif on a terminal, and falls back to
//! plain carriage-return frames when stdout is redirected.

use std::io::IsTerminal;
use std::sync::Arc;

use https_dwnld::{render_bar, BarStyle, ConsoleProgress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Creates a message-only progress bar drawn on stdout
pub fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
    pb.set_style(ProgressStyle::with_template("{msg}").expect("Failed to create progress style"));
    pb
}

/// Progress manager for terminal downloads
pub struct ProgressManager {
    pub pb: ProgressBar,
    style: BarStyle,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(style: BarStyle) -> Self {
        Self {
            pb: create_progress_bar(),
            style,
        }
    }

    /// Redraw for `current` of `total` chunks, finishing on the last one
    pub fn update(&self, current: u64, total: u64) {
        if self.pb.length() != Some(total) {
            self.pb.set_length(total);
        }
        self.pb.set_position(current);
        self.pb.set_message(render_bar(current, total, &self.style));
        if current >= total {
            self.pb.finish();
        }
    }

    /// Wrap into a callback suitable for `DownloadOptions::progress`
    pub fn into_callback(self) -> ProgressCallback {
        Arc::new(move |current, total| self.update(current, total))
    }
}

/// Progress callback for the CLI, `None` in raw mode
pub fn progress_callback(raw: bool) -> Option<ProgressCallback> {
    if raw {
        return None;
    }

    let style = BarStyle::default();
    if std::io::stdout().is_terminal() {
        Some(ProgressManager::new(style).into_callback())
    } else {
        Some(ConsoleProgress::new(std::io::stdout(), style).into_callback())
    }
}
