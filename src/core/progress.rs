//! Terminal progress bar rendering
//!
//! `format_progress` is pure; `ConsoleProgress` writes frames to any writer.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::core::stream::ProgressCallback;

const BAR_FILL: char = '█';
const BAR_EMPTY: char = '-';

/// Appearance of the progress bar
#[derive(Debug, Clone, PartialEq)]
pub struct BarStyle {
    pub prefix: String,
    pub suffix: String,
    pub width: usize,
    pub decimals: usize,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            prefix: "Downloading Progress:".to_string(),
            suffix: String::new(),
            width: 50,
            decimals: 1,
        }
    }
}

/// Bar and percentage without line control characters
pub fn render_bar(current: u64, total: u64, style: &BarStyle) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        current as f64 / total as f64
    };
    let filled = ((style.width as f64 * ratio).round() as usize).min(style.width);

    let mut bar = String::with_capacity(style.width + 2);
    bar.push('|');
    bar.extend(std::iter::repeat(BAR_FILL).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(style.width - filled));
    bar.push('|');

    format!(
        "{} {} {:.*}% {}",
        style.prefix,
        bar,
        style.decimals,
        100.0 * ratio,
        style.suffix
    )
}

/// Full frame: carriage return, bar, and a newline on the final step
pub fn format_progress(current: u64, total: u64, style: &BarStyle) -> String {
    let mut frame = format!("\r{}", render_bar(current, total, style));
    if current >= total {
        frame.push('\n');
    }
    frame
}

/// Writes progress frames to a terminal stream
///
/// Write errors are swallowed so rendering never aborts a download.
pub struct ConsoleProgress<W: Write> {
    out: W,
    style: BarStyle,
}

impl<W: Write> ConsoleProgress<W> {
    /// Create a sink writing to `out`
    pub fn new(out: W, style: BarStyle) -> Self {
        Self { out, style }
    }

    /// Write the frame for `current` of `total` chunks
    pub fn update(&mut self, current: u64, total: u64) {
        let frame = format_progress(current, total, &self.style);
        let _ = self.out.write_all(frame.as_bytes());
        let _ = self.out.flush();
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> ConsoleProgress<W> {
    /// Wrap into a callback suitable for `DownloadOptions::progress`
    pub fn into_callback(self) -> ProgressCallback {
        let sink = Mutex::new(self);
        Arc::new(move |current, total| {
            if let Ok(mut sink) = sink.lock() {
                sink.update(current, total);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrow() -> BarStyle {
        BarStyle {
            prefix: "P".to_string(),
            suffix: "S".to_string(),
            width: 10,
            decimals: 1,
        }
    }

    #[test]
    fn test_half_way_frame() {
        assert_eq!(
            format_progress(1, 2, &narrow()),
            "\rP |█████-----| 50.0% S"
        );
    }

    #[test]
    fn test_final_frame_ends_with_newline() {
        assert_eq!(
            format_progress(2, 2, &narrow()),
            "\rP |██████████| 100.0% S\n"
        );
    }

    #[test]
    fn test_decimals() {
        let style = BarStyle {
            decimals: 2,
            ..narrow()
        };
        assert!(render_bar(1, 3, &style).contains("33.33%"));

        let style = BarStyle {
            decimals: 0,
            ..narrow()
        };
        assert!(render_bar(1, 3, &style).contains(" 33% "));
    }

    #[test]
    fn test_zero_total_is_complete() {
        assert!(format_progress(0, 0, &narrow()).ends_with("100.0% S\n"));
    }

    #[test]
    fn test_default_style_width() {
        let bar = render_bar(0, 4, &BarStyle::default());
        assert!(bar.starts_with("Downloading Progress: |"));
        assert_eq!(bar.matches(BAR_EMPTY).count(), 50);
    }

    #[test]
    fn test_console_progress_writes_frames() {
        let mut console = ConsoleProgress::new(Vec::new(), narrow());
        console.update(1, 2);
        console.update(2, 2);

        let out = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(out.matches('\r').count(), 2);
        assert!(out.ends_with("100.0% S\n"));
    }

    #[test]
    fn test_console_progress_ignores_write_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
        }

        let callback = ConsoleProgress::new(Broken, narrow()).into_callback();
        callback(1, 1);
    }
}
