use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::models::{ProbeResult, ProbeStatus, RunSummary};

/// Environment context stamped into the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub target: String,
    pub environment: BTreeMap<String, String>,
}

impl ReportMetadata {
    pub fn for_target(target: &str) -> Self {
        let mut environment = BTreeMap::new();
        environment.insert("engine".to_string(), env!("CARGO_PKG_NAME").to_string());
        environment.insert("os".to_string(), std::env::consts::OS.to_string());
        Self {
            target: target.to_string(),
            environment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total: usize,
    pub success: usize,
    pub partial: usize,
    pub blocked: usize,
    /// blocked + error, the convention report consumers expect.
    pub failed: usize,
    pub success_rate: f64,
}

impl ExportSummary {
    fn from_summary(summary: &RunSummary) -> Self {
        Self {
            total: summary.total,
            success: summary.counts.success,
            partial: summary.counts.partial,
            blocked: summary.counts.blocked,
            failed: summary.counts.blocked + summary.counts.error,
            success_rate: summary.success_rate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueRow {
    pub id: usize,
    pub technique: String,
    pub status: ProbeStatus,
    pub description: String,
    pub payload: String,
    pub response_code: Option<u16>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub exported_at: String,
    pub version: String,
    pub target: String,
    pub summary: ExportSummary,
    pub techniques: Vec<TechniqueRow>,
    pub metadata: BTreeMap<String, String>,
}

/// Serializes run output into portable artifacts. No I/O happens here; the
/// caller persists the bytes.
pub struct JsonExporter;

impl JsonExporter {
    pub fn to_json(
        summary: &RunSummary,
        results: &[ProbeResult],
        metadata: &ReportMetadata,
    ) -> Result<Vec<u8>, ProbeError> {
        let doc = Self::document(summary, results, metadata);
        Ok(serde_json::to_vec_pretty(&doc)?)
    }

    pub fn document(
        summary: &RunSummary,
        results: &[ProbeResult],
        metadata: &ReportMetadata,
    ) -> ExportDocument {
        let techniques = results
            .iter()
            .enumerate()
            .map(|(i, r)| TechniqueRow {
                id: i + 1,
                technique: r.category.to_string(),
                status: r.status,
                description: r.description.clone(),
                payload: r.payload.clone(),
                response_code: r.response_code,
                duration_ms: r.duration_ms,
            })
            .collect();

        ExportDocument {
            exported_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            target: metadata.target.clone(),
            summary: ExportSummary::from_summary(summary),
            techniques,
            metadata: metadata.environment.clone(),
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<ExportDocument, ProbeError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

pub struct CsvExporter;

impl CsvExporter {
    pub const HEADER: &'static str = "technique,status,tests run,success,failed,description";

    pub fn to_csv(summary: &RunSummary, results: &[ProbeResult]) -> String {
        let mut lines = Vec::with_capacity(results.len() + 1);
        lines.push(Self::HEADER.to_string());

        for result in results {
            let (tests, success, failed) = summary
                .per_category
                .iter()
                .find(|b| b.category == result.category)
                .map(|b| {
                    (
                        b.counts.total(),
                        b.counts.success,
                        b.counts.blocked + b.counts.error,
                    )
                })
                .unwrap_or((0, 0, 0));

            lines.push(Self::row(
                result.category.as_str(),
                result.status,
                tests,
                success,
                failed,
                &result.description,
            ));
        }

        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }

    /// Re-renders a previously saved JSON report as CSV; category counts are
    /// rebuilt from the technique rows.
    pub fn from_document(doc: &ExportDocument) -> String {
        let mut lines = Vec::with_capacity(doc.techniques.len() + 1);
        lines.push(Self::HEADER.to_string());

        for row in &doc.techniques {
            let mut tests = 0;
            let mut success = 0;
            let mut failed = 0;
            for other in &doc.techniques {
                if other.technique == row.technique {
                    tests += 1;
                    match other.status {
                        ProbeStatus::Success => success += 1,
                        ProbeStatus::Blocked | ProbeStatus::Error => failed += 1,
                        ProbeStatus::Partial => {}
                    }
                }
            }
            lines.push(Self::row(
                &row.technique,
                row.status,
                tests,
                success,
                failed,
                &row.description,
            ));
        }

        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }

    fn row(
        technique: &str,
        status: ProbeStatus,
        tests: usize,
        success: usize,
        failed: usize,
        description: &str,
    ) -> String {
        [
            escape(technique),
            escape(&status.to_string()),
            tests.to_string(),
            success.to_string(),
            failed.to_string(),
            escape(description),
        ]
        .join(",")
    }
}

/// RFC 4180 quoting: only fields containing commas, quotes, or line breaks
/// get wrapped, with embedded quotes doubled.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::summarize;
    use crate::catalog::CategoryId;

    fn sample_results() -> Vec<ProbeResult> {
        vec![
            ProbeResult::classified(
                CategoryId::Header,
                "Loopback origin spoof".to_string(),
                "X-Forwarded-For: 127.0.0.1".to_string(),
                200,
                41,
            ),
            ProbeResult::classified(
                CategoryId::Header,
                "Null origin".to_string(),
                "Origin: null".to_string(),
                403,
                18,
            ),
            ProbeResult::classified(
                CategoryId::Method,
                "Replay as GET".to_string(),
                "GET".to_string(),
                500,
                27,
            ),
        ]
    }

    #[test]
    fn test_json_reparses_to_equivalent_document() {
        let results = sample_results();
        let summary = summarize(&results);
        let metadata = ReportMetadata::for_target("https://svc.example.test/delete");

        let doc = JsonExporter::document(&summary, &results, &metadata);
        let bytes = JsonExporter::to_json(&summary, &results, &metadata).unwrap();
        let parsed = JsonExporter::parse(&bytes).unwrap();

        assert_eq!(parsed.summary, doc.summary);
        assert_eq!(parsed.techniques, doc.techniques);
        assert_eq!(parsed.target, doc.target);
        assert_eq!(parsed.metadata, doc.metadata);
    }

    #[test]
    fn test_json_summary_fields() {
        let results = sample_results();
        let summary = summarize(&results);
        let metadata = ReportMetadata::for_target("https://svc.example.test/delete");
        let doc = JsonExporter::document(&summary, &results, &metadata);

        assert_eq!(doc.summary.total, 3);
        assert_eq!(doc.summary.success, 1);
        assert_eq!(doc.summary.partial, 1);
        assert_eq!(doc.summary.failed, 1);
        assert!((doc.summary.success_rate - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(doc.techniques[0].id, 1);

        let value: serde_json::Value =
            serde_json::to_value(&doc).unwrap();
        assert!(value.get("exportedAt").is_some());
        assert!(value["summary"].get("successRate").is_some());
    }

    #[test]
    fn test_csv_rows_and_counts() {
        let results = sample_results();
        let summary = summarize(&results);
        let csv = CsvExporter::to_csv(&summary, &results);
        let lines: Vec<&str> = csv.trim_end().split("\r\n").collect();

        assert_eq!(lines[0], CsvExporter::HEADER);
        assert_eq!(lines[1], "header,success,2,1,1,Loopback origin spoof");
        assert_eq!(lines[2], "header,blocked,2,1,1,Null origin");
        assert_eq!(lines[3], "method,partial,1,0,0,Replay as GET");
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_csv_from_document_matches_direct_export() {
        let results = sample_results();
        let summary = summarize(&results);
        let metadata = ReportMetadata::for_target("https://svc.example.test/delete");

        let direct = CsvExporter::to_csv(&summary, &results);
        let doc = JsonExporter::document(&summary, &results, &metadata);
        assert_eq!(CsvExporter::from_document(&doc), direct);
    }
}
