#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the SceneBay tools.
//!
//! Provides [`init_logger`], which sets up `indicatif-log-bridge` so that
//! `log::info!` and friends are suspended while the spinner redraws, and
//! [`spinner`] for the "searching" indicator shown while the model works.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Adds a steadily ticking spinner with `message` to `multi`.
///
/// Finish it with [`ProgressBar::finish_and_clear`] or
/// [`ProgressBar::finish_with_message`].
#[must_use]
pub fn spinner(multi: &MultiProgress, message: &str) -> ProgressBar {
    let bar = multi.add(ProgressBar::new_spinner());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while progress bars redraw.
///
/// Returns the [`MultiProgress`] that all progress bars must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    // Build the pretty-env-logger logger manually so we can wrap it.
    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Ignore error if logger was already set (e.g., in tests)

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_carries_message() {
        let multi = MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden());
        let bar = spinner(&multi, "Scouting Paris, France");
        assert_eq!(bar.message(), "Scouting Paris, France");
        bar.finish_and_clear();
        assert!(bar.is_finished());
    }

    #[test]
    fn init_logger_is_idempotent() {
        let _ = init_logger();
        let _ = init_logger();
    }
}
