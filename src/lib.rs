pub mod analyzer;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod http;
pub mod models;
pub mod probe;
pub mod reporter;
pub mod runner;
pub mod store;

pub use analyzer::summarize;
pub use catalog::{Catalog, CategoryId, TestCase};
pub use error::ProbeError;
pub use http::{HttpTransport, ProbeRequest, ProbeResponse, ReqwestTransport};
pub use models::{
    Payload, ProbeResult, ProbeStatus, RunConfig, RunSettings, RunSummary, Severity,
};
pub use reporter::{ConsoleReporter, CsvExporter, JsonExporter, ReportMetadata};
pub use runner::{BarSink, NullSink, RunOutcome, RunPhase, Runner};
pub use store::{PresetStore, StoredSettings};
