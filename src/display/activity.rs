//! Spinners, progress bars and status lines shown while lookups run.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// A running indicator, finished when dropped
///
/// Owns everything it needs, so it can be held across `.await` points
/// without borrowing the sink that created it.
#[derive(Debug, Default)]
pub struct Activity {
    bar: Option<ProgressBar>,
    /// Printed to stderr on drop
    completion: Option<String>,
}

impl Activity {
    /// An indicator that shows nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Wrap an existing bar; it is advanced by [`advance`](Self::advance)
    /// and cleared on drop
    pub fn from_bar(bar: ProgressBar) -> Self {
        Self {
            bar: Some(bar),
            completion: None,
        }
    }

    /// Spinner on stderr, or nothing when logs are verbose enough to clash with it
    pub fn spinner(message: &str) -> Self {
        if verbose_logging() {
            return Self::none();
        }

        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self::from_bar(bar)
    }

    /// Counted progress bar on stderr, or nothing under verbose logging
    pub fn bar(message: &str, total: u64) -> Self {
        if verbose_logging() {
            return Self::none();
        }

        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{msg} {bar:40.cyan/blue} {percent:>3}% ({pos} of {len}) {eta}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );
        bar.set_message(message.to_string());
        Self::from_bar(bar)
    }

    /// Print `[STATUS] <message>` now and `[STATUS] Completed: <message>` on drop
    pub fn announced(message: &str) -> Self {
        eprintln!("[STATUS] {}", message);
        Self {
            bar: None,
            completion: Some(format!("[STATUS] Completed: {}", message)),
        }
    }

    /// Record one completed unit of work
    pub fn advance(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }
}

impl Drop for Activity {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        if let Some(line) = self.completion.take() {
            eprintln!("{}", line);
        }
    }
}

/// Progress drawing is skipped when info-level logs are enabled
fn verbose_logging() -> bool {
    log::max_level() >= log::LevelFilter::Info
}
