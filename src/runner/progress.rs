use indicatif::{ProgressBar, ProgressStyle};

use crate::models::ProbeResult;

/// Snapshot handed to observers after each probe. Borrowed data only; the
/// runner keeps ownership of the result log.
#[derive(Debug)]
pub struct ProgressEvent<'a> {
    pub completed: usize,
    pub total: usize,
    pub description: &'a str,
    pub result: Option<&'a ProbeResult>,
}

/// Fire-and-forget observer. Implementations must not block the runner and
/// absorb their own failures.
pub trait ProgressSink {
    fn event(&self, event: &ProgressEvent);
}

pub struct NullSink;

impl ProgressSink for NullSink {
    fn event(&self, _event: &ProgressEvent) {}
}

/// Terminal progress bar. Length is taken from the first event so the sink
/// can be constructed before the run plan is known.
pub struct BarSink {
    pb: ProgressBar,
}

impl BarSink {
    pub fn new(verbose: bool) -> Self {
        let pb = ProgressBar::new(0);

        if verbose {
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .expect("Invalid progress bar template")
                    .progress_chars("#>-"),
            );
        } else {
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len}")
                    .expect("Invalid progress bar template")
                    .progress_chars("#>-"),
            );
        }

        Self { pb }
    }

    pub fn finish(&self, message: &str) {
        self.pb.finish_with_message(message.to_string());
    }
}

impl ProgressSink for BarSink {
    fn event(&self, event: &ProgressEvent) {
        if self.pb.length() != Some(event.total as u64) {
            self.pb.set_length(event.total as u64);
        }
        self.pb.set_message(event.description.to_string());
        self.pb.set_position(event.completed as u64);
    }
}
