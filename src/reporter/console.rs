use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::models::{RunSummary, Severity};

pub struct ConsoleReporter;

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Technique")]
    technique: String,
    #[tabled(rename = "Tests")]
    tests: usize,
    #[tabled(rename = "Success")]
    success: usize,
    #[tabled(rename = "Partial")]
    partial: usize,
    #[tabled(rename = "Blocked")]
    blocked: usize,
    #[tabled(rename = "Error")]
    error: usize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_summary(&self, summary: &RunSummary) {
        let rows: Vec<TableRow> = summary
            .per_category
            .iter()
            .map(|b| TableRow {
                technique: b.category.display_name().to_string(),
                tests: b.counts.total(),
                success: b.counts.success,
                partial: b.counts.partial,
                blocked: b.counts.blocked,
                error: b.counts.error,
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .to_string();

        println!("\n{}", table);
        println!(
            "Probes: {}  Success rate: {:.1}%",
            summary.total,
            summary.success_rate() * 100.0
        );
    }

    pub fn print_findings(&self, summary: &RunSummary) {
        if summary.findings.is_empty() {
            println!("\n{}", "No findings. Every probe was blocked or failed.".green());
            return;
        }

        println!("\n{}", "Findings:".red().bold());
        println!("{}", "=".repeat(80));

        for finding in &summary.findings {
            let severity = match finding.severity {
                Severity::High => "HIGH".red().bold(),
                Severity::Medium => "MEDIUM".yellow(),
            };
            let code = finding
                .response_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());

            println!(
                "\n[{}] {} - {}",
                severity,
                finding.category.display_name().yellow(),
                finding.description
            );
            println!("  Payload: {}", finding.payload.cyan());
            println!("  Response: {}", code);
        }

        println!("\n{}", "=".repeat(80));
        println!(
            "Total findings: {}",
            summary.findings.len().to_string().red().bold()
        );
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
