mod config;
mod payload;
mod result;
mod summary;

pub use config::{RunConfig, RunSettings};
pub use payload::Payload;
pub use result::{ProbeResult, ProbeStatus};
pub use summary::{CategoryBreakdown, Finding, RunSummary, Severity, StatusCounts};
