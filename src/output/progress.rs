//! Progress bar utilities for query matching.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a progress bar for matching the queries of one species group.
pub fn create_query_progress(
    total_queries: usize,
    species: &str,
    enabled: bool,
) -> Option<ProgressBar> {
    if !enabled || total_queries == 0 {
        return None;
    }

    let pb = ProgressBar::new(total_queries as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}/{{len}} queries - {species}"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Finish a progress bar with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}

/// Increment a progress bar.
pub fn inc_progress(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb {
        pb.inc(1);
    }
}

/// Finishes a progress bar when dropped, on success and error paths alike.
pub struct ProgressGuard {
    pb: Option<ProgressBar>,
    message: &'static str,
}

impl ProgressGuard {
    /// Take ownership of an optional progress bar.
    pub fn new(pb: Option<ProgressBar>, message: &'static str) -> Self {
        Self { pb, message }
    }

    /// Borrow the bar for incrementing.
    pub fn get(&self) -> Option<&ProgressBar> {
        self.pb.as_ref()
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        finish_progress(self.pb.take(), self.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_is_none() {
        assert!(create_query_progress(5, "LynxID2025", false).is_none());
    }

    #[test]
    fn test_empty_progress_is_none() {
        assert!(create_query_progress(0, "LynxID2025", true).is_none());
    }

    #[test]
    fn test_guard_exposes_bar() {
        let pb = ProgressBar::hidden();
        pb.set_length(3);
        let guard = ProgressGuard::new(Some(pb), "done");
        inc_progress(guard.get());
        assert_eq!(guard.get().map(ProgressBar::position), Some(1));
    }
}
