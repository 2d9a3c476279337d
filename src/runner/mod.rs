mod engine;
mod progress;

pub use engine::{CancelHandle, RunOutcome, RunPhase, RunState, Runner};
pub use progress::{BarSink, NullSink, ProgressEvent, ProgressSink};
