mod console;
mod export;

pub use console::ConsoleReporter;
pub use export::{CsvExporter, ExportDocument, ExportSummary, JsonExporter, ReportMetadata, TechniqueRow};
